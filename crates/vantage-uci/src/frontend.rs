//! Event-driven UCI front-end.
//!
//! Input lines are read on their own thread and delivered over a channel, so
//! `stop` and `isready` are handled while the engine searches. The main loop
//! polls the engine for completion and prints `bestmove` once it is done; an
//! infinite search holds its `bestmove` until `stop` or `quit` arrives.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use vantage_core::{Game, divide};
use vantage_engine::{
    DEFAULT_HASH_MB, Engine, EngineConfig, HASH_MB_RANGE, HistoryPolicy, SearchProgress, mate_distance,
};

use crate::command::{Command, GoParams, UciOption, parse_command};
use crate::error::UciError;

/// How often a running search is checked for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Protocol output shared between the main loop and the search worker.
#[derive(Clone)]
struct Output(Arc<Mutex<dyn Write + Send>>);

impl Output {
    fn line(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut out = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_fmt(args)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

/// A `go` that has not printed its `bestmove` yet.
struct ActiveSearch {
    /// Runs until told to stop.
    infinite: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The UCI front-end: current game, engine handle and protocol output.
pub struct UciFrontend {
    engine: Engine,
    game: Game,
    out: Output,
    active: Option<ActiveSearch>,
}

impl UciFrontend {
    /// Front-end writing protocol output to stdout.
    pub fn new(config: EngineConfig) -> Result<Self, UciError> {
        Self::with_output(config, io::stdout())
    }

    pub fn with_output<W>(config: EngineConfig, out: W) -> Result<Self, UciError>
    where
        W: Write + Send + 'static,
    {
        let out = Output(Arc::new(Mutex::new(out)));
        let mut engine = Engine::new(config)?;
        let sink = out.clone();
        engine.set_progress(move |progress| {
            if let Err(e) = sink.line(format_args!("{}", InfoLine(progress))) {
                warn!(error = %e, "failed to write search info");
            }
        })?;
        Ok(Self { engine, game: Game::default(), out, active: None })
    }

    /// Run the UCI loop on stdin until `quit` or end of input.
    pub fn run(self) -> Result<(), UciError> {
        self.run_with(io::BufReader::new(io::stdin()))
    }

    /// Run the UCI loop on `input` until `quit` or end of input.
    pub fn run_with<R>(mut self, input: R) -> Result<(), UciError>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>();
        thread::spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read input");
                        break;
                    }
                }
            }
        });

        loop {
            let line = if self.active.is_some() {
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(line) => Some(line),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => {
                        self.finish_after_input_closed()?;
                        break;
                    }
                }
            } else {
                match rx.recv() {
                    Ok(line) => Some(line),
                    Err(_) => break,
                }
            };

            // An infinite search reports only once told to stop.
            if self.active.as_ref().is_some_and(|s| !s.infinite) && self.engine.is_complete() {
                self.report_best_move()?;
            }
            let Some(line) = line else { continue };
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
        }

        info!("vantage shutting down");
        Ok(())
    }

    /// Parse and execute one input line. Only I/O errors end the loop; the
    /// rest are logged and the line is dropped.
    fn handle_line(&mut self, line: &str) -> Result<Flow, UciError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        debug!(cmd = %line, "received UCI command");

        match parse_command(line).and_then(|cmd| self.execute(cmd)) {
            Ok(flow) => Ok(flow),
            Err(e @ UciError::Io { .. }) => Err(e),
            Err(e) => {
                warn!(error = %e, cmd = %line, "command rejected");
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(&mut self, cmd: Command) -> Result<Flow, UciError> {
        match cmd {
            Command::Uci => self.handle_uci()?,
            Command::IsReady => self.out.line(format_args!("readyok"))?,
            Command::UciNewGame => {
                self.engine.new_game()?;
                self.game = Game::default();
            }
            Command::Position(game) => self.game = game,
            Command::Go(params) => self.handle_go(params)?,
            Command::Stop => {
                if self.active.is_some() {
                    self.engine.stop();
                    self.report_best_move()?;
                }
            }
            Command::SetOption(option) => self.handle_setoption(option)?,
            Command::Display => self.handle_display()?,
            Command::Perft(depth) => self.handle_perft(depth)?,
            Command::Quit => {
                if self.active.is_some() {
                    self.engine.stop();
                    self.report_best_move()?;
                }
                return Ok(Flow::Quit);
            }
            Command::Unknown(cmd) => debug!(%cmd, "ignoring unknown command"),
        }
        Ok(Flow::Continue)
    }

    fn handle_uci(&self) -> io::Result<()> {
        self.out.line(format_args!("id name vantage {}", env!("CARGO_PKG_VERSION")))?;
        self.out.line(format_args!("id author the vantage developers"))?;
        self.out.line(format_args!(
            "option name Hash type spin default {} min {} max {}",
            DEFAULT_HASH_MB,
            HASH_MB_RANGE.start(),
            HASH_MB_RANGE.end()
        ))?;
        self.out.line(format_args!("option name ClearHistory type check default false"))?;
        self.out.line(format_args!("uciok"))
    }

    fn handle_go(&mut self, params: GoParams) -> Result<(), UciError> {
        if self.active.is_some() {
            warn!("go received while searching, ignoring");
            return Ok(());
        }
        let budget = params.budget(self.game.board().side_to_move());
        let infinite = params.infinite || (budget.is_unlimited() && params.depth.is_none());

        self.engine.submit(self.game.board(), self.game.repetitions(), params.depth, budget)?;
        self.active = Some(ActiveSearch { infinite });
        Ok(())
    }

    fn handle_setoption(&mut self, option: UciOption) -> Result<(), UciError> {
        match option {
            UciOption::Hash(mb) => self.engine.set_hash(mb)?,
            UciOption::ClearHistory(clear) => {
                let policy = if clear { HistoryPolicy::Reset } else { HistoryPolicy::Age };
                self.engine.set_history_policy(policy)?;
            }
        }
        debug!(?option, "option set");
        Ok(())
    }

    fn handle_display(&self) -> io::Result<()> {
        let board = self.game.board();
        self.out.line(format_args!("{}", board.pretty()))?;
        self.out.line(format_args!(""))?;
        self.out.line(format_args!("Fen: {}", board.to_fen()))?;
        self.out.line(format_args!("Key: {:016x}", board.hash()))
    }

    fn handle_perft(&self, depth: u32) -> io::Result<()> {
        let start = Instant::now();
        let counts = divide(self.game.board(), depth);
        let total: u64 = counts.iter().map(|(_, nodes)| nodes).sum();
        for (mv, nodes) in &counts {
            self.out.line(format_args!("{mv}: {nodes}"))?;
        }
        self.out.line(format_args!(""))?;
        self.out.line(format_args!("Nodes searched: {total}"))?;
        debug!(depth, total, elapsed_ms = start.elapsed().as_millis() as u64, "perft finished");
        Ok(())
    }

    /// Input is gone: stop a search that would never end on its own, then
    /// print its result.
    fn finish_after_input_closed(&mut self) -> io::Result<()> {
        if self.active.as_ref().is_some_and(|s| s.infinite) {
            self.engine.stop();
        }
        self.report_best_move()
    }

    /// Collect the active search and print `bestmove`.
    fn report_best_move(&mut self) -> io::Result<()> {
        if self.active.take().is_none() {
            return Ok(());
        }
        let best = match self.engine.wait() {
            Ok(result) => {
                info!(
                    depth = result.depth,
                    score = result.score,
                    nodes = result.stats.nodes,
                    nps = result.nps(),
                    "search complete"
                );
                result.best_move
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                None
            }
        };
        match best {
            Some(mv) => self.out.line(format_args!("bestmove {}", mv.to_uci())),
            None => self.out.line(format_args!("bestmove 0000")),
        }
    }
}

/// Formats one `info` line for a completed depth.
struct InfoLine<'a>(&'a SearchProgress);

impl fmt::Display for InfoLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        let ms = p.elapsed.as_millis().max(1);
        let nps = u128::from(p.nodes) * 1000 / ms;

        write!(f, "info depth {} seldepth {} score ", p.depth, p.seldepth)?;
        match mate_distance(p.score) {
            Some(moves) => write!(f, "mate {moves}")?,
            None => write!(f, "cp {}", p.score)?,
        }
        write!(f, " nodes {} nps {} time {} pv", p.nodes, nps, ms)?;
        for mv in &p.pv {
            write!(f, " {}", mv.to_uci())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::{Cursor, Read};
    use std::time::Duration;

    use vantage_engine::MATE;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Input that hands out its chunks one at a time, pausing before each.
    struct PacedInput(VecDeque<(Duration, &'static str)>);

    impl Read for PacedInput {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let Some((pause, chunk)) = self.0.pop_front() else {
                return Ok(0);
            };
            thread::sleep(pause);
            buf[..chunk.len()].copy_from_slice(chunk.as_bytes());
            Ok(chunk.len())
        }
    }

    /// Feed `script` to a fresh front-end and return everything it printed.
    fn session(script: &str) -> Vec<String> {
        run_session(Cursor::new(script.to_string()))
    }

    fn run_session<R: BufRead + Send + 'static>(input: R) -> Vec<String> {
        let buf = SharedBuf::default();
        let config = EngineConfig { hash_mb: 1, ..EngineConfig::default() };
        let frontend = UciFrontend::with_output(config, buf.clone()).unwrap();
        frontend.run_with(input).unwrap();

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
    }

    fn progress(score: i32) -> SearchProgress {
        SearchProgress {
            depth: 3,
            score,
            nodes: 5000,
            seldepth: 7,
            elapsed: Duration::from_millis(10),
            pv: vec![],
        }
    }

    #[test]
    fn handshake() {
        let out = session("uci\nisready\nquit\n");
        assert!(out[0].starts_with("id name vantage"));
        assert!(out.contains(&"option name Hash type spin default 16 min 1 max 4096".to_string()));
        assert!(out.contains(&"uciok".to_string()));
        assert_eq!(out.last().map(String::as_str), Some("readyok"));
    }

    #[test]
    fn go_depth_prints_info_then_bestmove() {
        let out = session("position startpos moves e2e4\ngo depth 3\n");
        let infos: Vec<&String> = out.iter().filter(|l| l.starts_with("info depth")).collect();
        assert_eq!(infos.len(), 3);
        assert!(infos[0].contains(" score cp ") && infos[0].contains(" pv "));

        let last = out.last().unwrap();
        assert!(last.starts_with("bestmove "));
        let best = last.trim_start_matches("bestmove ");
        let mut game = Game::default();
        game.play_uci("e2e4").unwrap();
        assert!(game.play_uci(best).is_ok(), "bestmove {best} is legal for black");
    }

    #[test]
    fn mate_is_reported_in_moves() {
        let out = session("position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1\ngo depth 3\n");
        assert!(out.iter().any(|l| l.contains("score mate 1")));
        assert_eq!(out.last().map(String::as_str), Some("bestmove a1a8"));
    }

    #[test]
    fn no_legal_moves_prints_null_move() {
        let out = session("position fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1\ngo depth 2\n");
        assert_eq!(out.last().map(String::as_str), Some("bestmove 0000"));
    }

    #[test]
    fn stop_ends_infinite_search() {
        let out = session("position startpos\ngo infinite\nstop\nisready\n");
        let best = out.iter().position(|l| l.starts_with("bestmove")).expect("bestmove printed");
        let ready = out.iter().position(|l| l == "readyok").expect("readyok printed");
        assert!(best < ready);
    }

    #[test]
    fn infinite_search_holds_bestmove_until_stop() {
        // The mate is found at depth 1 and the worker finishes long before `stop`.
        let input = PacedInput(VecDeque::from([
            (Duration::ZERO, "position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1\ngo infinite\n"),
            (Duration::from_millis(300), "isready\n"),
            (Duration::ZERO, "stop\n"),
        ]));
        let out = run_session(io::BufReader::new(input));

        let ready = out.iter().position(|l| l == "readyok").expect("readyok printed");
        let best = out.iter().position(|l| l.starts_with("bestmove")).expect("bestmove printed");
        assert!(ready < best, "bestmove printed before stop: {out:?}");
        assert_eq!(out[best], "bestmove a1a8");
        assert_eq!(out.iter().filter(|l| l.starts_with("bestmove")).count(), 1);
    }

    #[test]
    fn infinite_search_stops_when_input_closes() {
        let out = session("go infinite\n");
        assert!(out.last().unwrap().starts_with("bestmove "));
    }

    #[test]
    fn bad_commands_are_skipped() {
        let out = session("position startpos moves e2e5\nsetoption name Hash value 0\nxyzzy\nisready\n");
        assert_eq!(out, vec!["readyok".to_string()]);
    }

    #[test]
    fn display_and_perft() {
        let out = session("position startpos\nd\nperft 2\n");
        assert!(out.contains(&format!("Fen: {}", vantage_core::STARTING_FEN)));
        assert!(out.contains(&"e2e4: 20".to_string()));
        assert_eq!(out.last().map(String::as_str), Some("Nodes searched: 400"));
    }

    #[test]
    fn options_apply_between_searches() {
        let out = session(
            "setoption name Hash value 2\nsetoption name ClearHistory value true\nucinewgame\ngo depth 1\n",
        );
        assert!(out.last().unwrap().starts_with("bestmove "));
    }

    #[test]
    fn info_line_formats_cp_and_mate() {
        assert_eq!(
            InfoLine(&progress(35)).to_string(),
            "info depth 3 seldepth 7 score cp 35 nodes 5000 nps 500000 time 10 pv"
        );
        assert!(InfoLine(&progress(MATE - 3)).to_string().contains("score mate 2 "));
        assert!(InfoLine(&progress(-(MATE - 2))).to_string().contains("score mate -1 "));
    }
}
