use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use dots_engine::{
    Cell, Computer, Difficulty, Game, Mode, PeerEvent, PeerTransport, Player, Point,
};

use crate::net::TcpTransport;
use crate::records;

pub struct Options {
    pub width: u8,
    pub height: u8,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub seed: Option<u64>,
    pub name: String,
    pub listen: Option<String>,
    pub connect: Option<String>,
    pub records: PathBuf,
}

pub fn run(opts: Options) -> anyhow::Result<()> {
    let (game, local) = match opts.mode {
        Mode::Network => run_network(&opts)?,
        Mode::VsComputer => run_vs_computer(&opts)?,
        _ => run_local(&opts)?,
    };
    finish(&opts, &game, local)
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Place(Point),
    PlaceAs(Player, Point),
    Undo,
    Redo,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["undo"] => Some(Command::Undo),
        ["redo"] => Some(Command::Redo),
        ["quit" | "exit" | "q"] => Some(Command::Quit),
        ["help" | "?"] => Some(Command::Help),
        ["b", x, y] => parse_point(x, y).map(|p| Command::PlaceAs(Player::Blue, p)),
        ["r", x, y] => parse_point(x, y).map(|p| Command::PlaceAs(Player::Red, p)),
        [x, y] => parse_point(x, y).map(Command::Place),
        _ => None,
    }
}

fn parse_point(x: &str, y: &str) -> Option<Point> {
    Some((x.parse().ok()?, y.parse().ok()?))
}

fn cell_char(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Active(Player::Blue) => 'B',
        Cell::Active(Player::Red) => 'R',
        Cell::Captured(Player::Blue) => 'b',
        Cell::Captured(Player::Red) => 'r',
        Cell::Dead => '#',
    }
}

fn render(game: &Game) -> String {
    let mut out = format!(
        "Blue {} - Red {}   {} to move\n   ",
        game.score().get(Player::Blue),
        game.score().get(Player::Red),
        game.turn(),
    );
    for x in 0..game.cols() {
        out.push((b'0' + x % 10) as char);
    }
    out.push('\n');
    for y in 0..game.rows() {
        out.push_str(&format!("{y:2} "));
        for x in 0..game.cols() {
            out.push(cell_char(game.board().cell_at((x, y)).unwrap_or(Cell::Empty)));
        }
        out.push('\n');
    }
    out
}

fn print_help(mode: Mode) {
    println!("commands: x y (place), undo, redo, quit");
    if mode == Mode::Sandbox {
        println!("sandbox: b x y / r x y places for an explicit color");
    }
}

fn prompt() -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn run_local(opts: &Options) -> anyhow::Result<(Game, Player)> {
    let mut game = Game::new(opts.width, opts.height, opts.mode);
    print_help(opts.mode);
    println!("{}", render(&game));

    while let Some(line) = prompt()? {
        match parse_command(&line) {
            Some(Command::Place(p)) => {
                if game.try_place(p).is_err() {
                    tracing::debug!("ignored unplayable point {p:?}");
                }
            }
            Some(Command::PlaceAs(player, p)) => {
                if opts.mode == Mode::Sandbox {
                    if game.try_place_as(player, p).is_err() {
                        tracing::debug!("ignored unplayable point {p:?}");
                    }
                } else {
                    println!("explicit colors are for sandbox games");
                }
            }
            Some(Command::Undo) => {
                game.undo();
            }
            Some(Command::Redo) => {
                game.redo();
            }
            Some(Command::Quit) => break,
            Some(Command::Help) | None => print_help(opts.mode),
        }
        println!("{}", render(&game));
        if game.board().is_full() {
            println!("board full - game over");
            break;
        }
    }
    Ok((game, Player::Blue))
}

fn run_vs_computer(opts: &Options) -> anyhow::Result<(Game, Player)> {
    let mut game = Game::new(opts.width, opts.height, Mode::VsComputer);
    let mut computer = match opts.seed {
        Some(seed) => Computer::with_seed(opts.difficulty, seed),
        None => Computer::new(opts.difficulty),
    };
    print_help(Mode::VsComputer);
    println!("{}", render(&game));

    while let Some(line) = prompt()? {
        match parse_command(&line) {
            Some(Command::Place(p)) => {
                if game.try_place(p).is_err() {
                    tracing::debug!("ignored unplayable point {p:?}");
                    continue;
                }
                let reply = computer
                    .choose_move(game.board(), p)
                    .context("computer search failed")?;
                match reply {
                    Some(reply) => {
                        game.try_place(reply)
                            .map_err(|_| anyhow::anyhow!("computer chose an unplayable point"))?;
                        println!("computer plays {} {}", reply.0, reply.1);
                    }
                    None => {
                        println!("{}", render(&game));
                        println!("computer has no move - game over");
                        break;
                    }
                }
            }
            Some(Command::Undo) => {
                // Take back the computer's reply and the player's move together.
                if game.undo() {
                    game.undo();
                }
            }
            Some(Command::Redo) => {
                if game.redo() {
                    game.redo();
                }
            }
            Some(Command::Quit) => break,
            Some(Command::PlaceAs(..)) => println!("explicit colors are for sandbox games"),
            Some(Command::Help) | None => print_help(Mode::VsComputer),
        }
        println!("{}", render(&game));
        if game.board().is_full() {
            println!("board full - game over");
            break;
        }
    }
    Ok((game, Player::Blue))
}

fn run_network(opts: &Options) -> anyhow::Result<(Game, Player)> {
    let (mut transport, local) = match (&opts.listen, &opts.connect) {
        (Some(addr), _) => (TcpTransport::listen(addr)?, Player::Blue),
        (None, Some(addr)) => (TcpTransport::connect(addr)?, Player::Red),
        (None, None) => anyhow::bail!("network games need --listen or --connect"),
    };
    let mut game = Game::new(opts.width, opts.height, Mode::Network);
    println!("you are {local}");
    println!("{}", render(&game));

    loop {
        if game.board().is_full() {
            println!("board full - game over");
            transport.close()?;
            break;
        }
        if game.turn() == local {
            let Some(line) = prompt()? else {
                transport.close()?;
                break;
            };
            match parse_command(&line) {
                Some(Command::Place(p)) => {
                    if game.try_place(p).is_err() {
                        tracing::debug!("ignored unplayable point {p:?}");
                        continue;
                    }
                    transport.send(p)?;
                }
                Some(Command::Quit) => {
                    transport.close()?;
                    break;
                }
                Some(Command::Undo) | Some(Command::Redo) => {
                    println!("undo is disabled in network games");
                    continue;
                }
                _ => {
                    print_help(Mode::Network);
                    continue;
                }
            }
        } else {
            println!("waiting for {}...", local.opp());
            match transport.recv()? {
                PeerEvent::Move(p) => {
                    game.try_place(p)
                        .map_err(|_| anyhow::anyhow!("peer sent an unplayable point {p:?}"))?;
                }
                PeerEvent::Closed => {
                    println!("peer left - game over");
                    break;
                }
            }
        }
        println!("{}", render(&game));
    }
    Ok((game, local))
}

fn finish(opts: &Options, game: &Game, local: Player) -> anyhow::Result<()> {
    let blue = game.score().get(Player::Blue);
    let red = game.score().get(Player::Red);
    println!("final score: Blue {blue} - Red {red}");

    // The ledger tracks named players; sandbox doodles stay out of it.
    if opts.mode == Mode::Sandbox {
        return Ok(());
    }
    let entry = records::Entry {
        name: opts.name.clone(),
        cols: game.cols(),
        rows: game.rows(),
        score: game.score().get(local),
    };
    records::append(&opts.records, &entry)?;
    let entries = records::load(&opts.records)?;
    if let Some(best) = records::best(&entries, &entry.name, entry.cols, entry.rows) {
        println!("best score for {} on this board: {best}", entry.name);
    }
    Ok(())
}
