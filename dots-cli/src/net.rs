use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use dots_engine::{PeerEvent, PeerTransport, Point};
use serde::{Deserialize, Serialize};

/// One line of the wire protocol, JSON-encoded.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireMessage {
    Move { x: u8, y: u8 },
    Bye,
}

/// Line-delimited JSON over a single TCP stream. The host plays Blue and
/// the joiner Red; delivery order is the turn order.
pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TcpTransport {
    /// Host a game: accept exactly one peer.
    pub fn listen(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        tracing::info!("waiting for a peer on {addr}");
        let (stream, peer) = listener.accept()?;
        tracing::info!("peer connected from {peer}");
        Self::from_stream(stream)
    }

    /// Join a hosted game.
    pub fn connect(addr: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        tracing::info!("connected to {addr}");
        Self::from_stream(stream)
    }

    fn from_stream(stream: TcpStream) -> std::io::Result<Self> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(TcpTransport {
            reader,
            writer: stream,
        })
    }

    /// Signal end of game to the peer.
    pub fn close(&mut self) -> std::io::Result<()> {
        self.write_message(&WireMessage::Bye)
    }

    fn write_message(&mut self, msg: &WireMessage) -> std::io::Result<()> {
        let mut line = serde_json::to_string(msg).map_err(std::io::Error::other)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())
    }
}

impl PeerTransport for TcpTransport {
    fn send(&mut self, point: Point) -> std::io::Result<()> {
        self.write_message(&WireMessage::Move {
            x: point.0,
            y: point.1,
        })
    }

    fn recv(&mut self) -> std::io::Result<PeerEvent> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(PeerEvent::Closed);
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return match serde_json::from_str(line) {
                Ok(WireMessage::Move { x, y }) => Ok(PeerEvent::Move((x, y))),
                Ok(WireMessage::Bye) => Ok(PeerEvent::Closed),
                Err(e) => Err(std::io::Error::other(e)),
            };
        }
    }
}
