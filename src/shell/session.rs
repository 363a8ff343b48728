use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::data::batch;
use crate::data::store::RecordStore;
use crate::math::Matrix;
use crate::network::network::Network;
use crate::shell::command::Command;
use crate::train::{evaluate, train_loop, TrainConfig};

const PROMPT: &str = "#> ";

const USAGE: &str = "\
usage:
    ?, h, help          show this help
    q, quit, exit       exit program
    <num>               view data at index <num>
    p[:]<num>           predict data at index <num>
    auc[:]<count>       evaluate accuracy use <count> records
    train[:]<loop>      train <loop>s use loaded dataset
    save[:]<file>       save model to <file>
    load[:]<file>       load model from <file>
";

/// Whether the loop should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session over a loaded dataset and the network being trained.
pub struct Shell {
    store: RecordStore,
    network: Network,
    training: TrainConfig,
}

impl Shell {
    /// `training.epochs` is ignored; each `train` command supplies its own.
    pub fn new(store: RecordStore, network: Network, training: TrainConfig) -> Shell {
        Shell {
            store,
            network,
            training,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Reads whitespace-separated commands until `quit` or end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so they end
    /// up reported as unknown commands instead of ending the session.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            out.write_all(PROMPT.as_bytes())?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            for token in line.split_whitespace() {
                if self.execute(token, out)? == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }

    /// Parses and runs one token. Command failures are reported on `out`;
    /// only failures writing to `out` itself are returned.
    pub fn execute<W: Write>(&mut self, token: &str, out: &mut W) -> io::Result<Flow> {
        let command = match Command::parse(token) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Help => out.write_all(USAGE.as_bytes())?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Load(path) => match self.network.load_model(&path) {
                Ok(()) => writeln!(out, "loaded")?,
                Err(e) => writeln!(out, "cannot load: {} ({})", path, e)?,
            },
            Command::Save(path) => match self.network.save_model(&path) {
                Ok(()) => writeln!(out, "saved")?,
                Err(e) => writeln!(out, "cannot save: {} ({})", path, e)?,
            },
            Command::Train(epochs) => self.train(epochs, out)?,
            Command::Auc(count) => self.auc(count, out)?,
            Command::Predict(index) => self.predict(index, out)?,
            Command::View(index) => self.view(index, out)?,
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn train<W: Write>(&mut self, epochs: Option<usize>, out: &mut W) -> io::Result<()> {
        let epochs = match epochs {
            None => 1,
            Some(0) => {
                log::warn!("epoch count 0 raised to 1");
                writeln!(out, "epochs: 0 too small, set to 1")?;
                1
            }
            Some(n) => n,
        };
        let config = TrainConfig {
            epochs,
            ..self.training.clone()
        };

        let started = Instant::now();
        match train_loop(&mut self.network, self.store.records(), &config) {
            Ok(history) => {
                for stats in &history {
                    writeln!(
                        out,
                        "loop: {}/{} loss: {:.6} ({} ms)",
                        stats.epoch, stats.total_epochs, stats.train_loss, stats.elapsed_ms
                    )?;
                }
                writeln!(
                    out,
                    "finished, used {:.3}sec(s)",
                    started.elapsed().as_secs_f64()
                )
            }
            Err(e) => writeln!(out, "training failed: {}", e),
        }
    }

    fn auc<W: Write>(&self, count: Option<usize>, out: &mut W) -> io::Result<()> {
        let total = self.store.len();
        if total == 0 {
            return writeln!(out, "no records loaded");
        }
        let count = match count {
            Some(n) if n > 0 && n <= total => n,
            Some(n) => {
                log::warn!("auc count {} outside 1..={}, using {}", n, total, total);
                writeln!(out, "set count to: {}", total)?;
                total
            }
            None => total,
        };

        match evaluate(&self.network, &self.store.records()[..count]) {
            Ok(accuracy) => writeln!(out, "auc: {}", accuracy),
            Err(e) => writeln!(out, "cannot evaluate: {}", e),
        }
    }

    fn predict<W: Write>(&self, index: usize, out: &mut W) -> io::Result<()> {
        let record = match self.store.get(index) {
            Some(record) => record,
            None => return writeln!(out, "invalid index: {}", index),
        };
        writeln!(out, "{} target: {}", index, record.label())?;

        match self.network.predict(&batch::inputs(std::slice::from_ref(record))) {
            Ok(prediction) => writeln!(out, "{}", format_row(&prediction, 0)),
            Err(e) => writeln!(out, "cannot predict: {}", e),
        }
    }

    fn view<W: Write>(&self, index: usize, out: &mut W) -> io::Result<()> {
        match self.store.get(index) {
            Some(record) => {
                writeln!(out, "{} target: {}", index, record.label())?;
                out.write_all(record.hex_dump().as_bytes())
            }
            None => writeln!(out, "invalid index: {}", index),
        }
    }
}

fn format_row(m: &Matrix, row: usize) -> String {
    m.row(row)
        .iter()
        .map(|v| format!("{:.6}", v))
        .collect::<Vec<_>>()
        .join(" ")
}
