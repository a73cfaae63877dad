use std::{
    fs,
    io::{self, Read as _, Write as _},
    path::Path,
};

use anyhow::Context as _;
use fourplay_engine::Board;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

/// Writes `value` as pretty JSON to stdout, followed by a newline.
pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write JSON to stdout")?;
    writeln!(stdout).context("Failed to write newline after JSON to stdout")?;
    Ok(())
}

/// Seeded generator when `seed` is given, otherwise seeded from the thread-local generator.
pub(crate) fn make_rng(seed: Option<u64>) -> Pcg64Mcg {
    match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_rng(&mut rand::rng()),
    }
}

/// Reads a board in the text format from `path`, or from stdin when `path` is `None` or `-`.
pub(crate) fn read_board(path: Option<&Path>, win_length: usize) -> anyhow::Result<Board> {
    let (text, source) = match path {
        Some(path) if path != Path::new("-") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read board file: {}", path.display()))?;
            (text, path.display().to_string())
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read board from stdin")?;
            (text, "stdin".to_owned())
        }
    };
    Board::parse(&text, win_length).with_context(|| format!("Failed to parse board from {source}"))
}
