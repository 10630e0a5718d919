//! Dedicated search worker thread.
//!
//! The worker owns one engine per strategy, and with them the transposition
//! table and killer/history heuristics for the whole session. Callers send a
//! position snapshot plus a difficulty over a channel and receive exactly one
//! reply on a per-request channel, which they may poll without blocking or
//! wait on. Nothing is shared between threads except the channels and a
//! shutdown flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::{Difficulty, Engine, EngineOutput};
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Move;
use crate::game_state::position::Position;

const WORKER_THREAD_NAME: &str = "search-worker";

type Reply = ChessResult<EngineOutput>;

struct SearchRequest {
    position: Position,
    difficulty: Difficulty,
    reply: Sender<Reply>,
}

enum WorkerMessage {
    Search(SearchRequest),
    NewGame,
}

/// Result of a non-blocking check on a pending search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPoll {
    Pending,
    Ready(EngineOutput),
}

/// Reply handle for one search request.
#[derive(Debug)]
pub struct PendingSearch {
    reply: Receiver<Reply>,
}

impl PendingSearch {
    pub fn poll(&self) -> ChessResult<SearchPoll> {
        match self.reply.try_recv() {
            Ok(reply) => reply.map(SearchPoll::Ready),
            Err(TryRecvError::Empty) => Ok(SearchPoll::Pending),
            Err(TryRecvError::Disconnected) => Err(ChessError::WorkerDisconnected),
        }
    }

    /// Block until the worker answers.
    pub fn wait(self) -> ChessResult<EngineOutput> {
        self.reply
            .recv()
            .map_err(|_| ChessError::WorkerDisconnected)?
    }

    #[inline]
    pub fn wait_for_move(self) -> ChessResult<Option<Move>> {
        Ok(self.wait()?.best_move)
    }
}

/// Dropping the worker waits for the search in progress to finish (at most
/// one tier budget); requests still queued are dropped unanswered and their
/// `PendingSearch` reports `WorkerDisconnected`.
pub struct SearchWorker {
    sender: Option<Sender<WorkerMessage>>,
    shutting_down: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    pub fn spawn() -> ChessResult<Self> {
        Self::with_engines(IterativeEngine::new(), RandomEngine::new())
    }

    /// Spawn a worker around preconfigured engines (seeded, custom options).
    pub fn with_engines(iterative: IterativeEngine, random: RandomEngine) -> ChessResult<Self> {
        let (sender, receiver) = mpsc::channel();
        let shutting_down = Arc::new(AtomicBool::new(false));
        let worker_flag = Arc::clone(&shutting_down);
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || run_worker(receiver, worker_flag, iterative, random))
            .map_err(|err| ChessError::WorkerSpawn(err.to_string()))?;
        Ok(Self {
            sender: Some(sender),
            shutting_down,
            handle: Some(handle),
        })
    }

    pub fn request(&self, position: &Position, difficulty: Difficulty) -> ChessResult<PendingSearch> {
        let (reply, receiver) = mpsc::channel();
        self.send(WorkerMessage::Search(SearchRequest {
            position: position.clone(),
            difficulty,
            reply,
        }))?;
        Ok(PendingSearch { reply: receiver })
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&self) -> ChessResult<()> {
        self.send(WorkerMessage::NewGame)
    }

    fn send(&self, message: WorkerMessage) -> ChessResult<()> {
        self.sender
            .as_ref()
            .ok_or(ChessError::WorkerDisconnected)?
            .send(message)
            .map_err(|_| ChessError::WorkerDisconnected)
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.shutting_down.store(true, Ordering::Relaxed);
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }
}

fn run_worker(
    receiver: Receiver<WorkerMessage>,
    shutting_down: Arc<AtomicBool>,
    mut iterative: IterativeEngine,
    mut random: RandomEngine,
) {
    while let Ok(message) = receiver.recv() {
        match message {
            // Dropping the request closes its reply channel.
            WorkerMessage::Search(_) if shutting_down.load(Ordering::Relaxed) => {}
            WorkerMessage::Search(request) => {
                let limits = request.difficulty.limits();
                let engine: &mut dyn Engine = if request.difficulty.is_random() {
                    &mut random
                } else {
                    &mut iterative
                };
                let reply = engine.choose_move(&request.position, &limits);
                if let Err(err) = &reply {
                    warn!(%err, difficulty = %request.difficulty, "search request failed");
                }
                if request.reply.send(reply).is_err() {
                    warn!("search requester went away before the reply");
                }
            }
            WorkerMessage::NewGame => {
                iterative.new_game();
                random.new_game();
            }
        }
    }
    debug!("search worker shutting down");
}
