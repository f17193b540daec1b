use crate::board::Board;

/// Snapshot-based undo/redo over fully independent board copies.
///
/// The top of the undo stack is always the current committed state; the
/// bottom is the initial position and is never popped, so a game cannot
/// be rewound past its start. In networked play the remote state stays
/// authoritative, so the whole mechanism is switched off with `enabled`.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Board>,
    redo: Vec<Board>,
    enabled: bool,
}

impl History {
    pub fn new(initial: Board, enabled: bool) -> Self {
        History {
            undo: vec![initial],
            redo: Vec::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn can_undo(&self) -> bool {
        self.enabled && self.undo.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        self.enabled && !self.redo.is_empty()
    }

    /// Record a committed move. Any redoable future is discarded.
    pub fn commit(&mut self, board: &Board) {
        if !self.enabled {
            return;
        }
        self.undo.push(board.clone());
        self.redo.clear();
    }

    /// Step back one committed move and return the state to restore.
    pub fn undo(&mut self) -> Option<Board> {
        if !self.can_undo() {
            return None;
        }
        let current = self.undo.pop()?;
        self.redo.push(current);
        self.undo.last().cloned()
    }

    /// Reapply the most recently undone move.
    pub fn redo(&mut self) -> Option<Board> {
        if !self.enabled {
            return None;
        }
        let next = self.redo.pop()?;
        self.undo.push(next.clone());
        Some(next)
    }
}
