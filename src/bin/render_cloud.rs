//! Render the word cloud for one song without the terminal UI.
//!
//! Usage: cargo run --bin render_cloud -- <title> [--artist NAME] [--out DIR] [--lyrics-file PATH] [--json] [--no-collocations]
//!
//! With `--lyrics-file` the text is read from disk and Genius is never
//! contacted. `--json` prints a machine-readable summary instead of the
//! word table. `--no-collocations` counts every word on its own.

use anyhow::{bail, Context};
use serde::Serialize;
use std::path::{Path, PathBuf};

use lyricloud::cloud::{WordCloudGenerator, WordFrequency};
use lyricloud::config::Config;
use lyricloud::error::Error;
use lyricloud::export;
use lyricloud::logging;
use lyricloud::pipeline::{Outcome, Pipeline};

#[derive(Debug, Default)]
struct Args {
    title: String,
    artist: Option<String>,
    out: Option<PathBuf>,
    lyrics_file: Option<PathBuf>,
    json: bool,
    no_collocations: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    title: &'a str,
    path: &'a Path,
    width: u32,
    height: u32,
    placed: usize,
    words: &'a [WordFrequency],
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut title_parts = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--artist" => parsed.artist = Some(args.next().context("--artist needs a value")?),
            "--out" => parsed.out = Some(args.next().context("--out needs a directory")?.into()),
            "--lyrics-file" => parsed.lyrics_file = Some(args.next().context("--lyrics-file needs a path")?.into()),
            "--json" => parsed.json = true,
            "--no-collocations" => parsed.no_collocations = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => title_parts.push(arg),
        }
    }

    parsed.title = title_parts.join(" ").trim().to_string();
    if parsed.title.is_empty() {
        bail!("usage: render_cloud <title> [--artist NAME] [--out DIR] [--lyrics-file PATH] [--json] [--no-collocations]");
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_stderr_logging();

    let args = parse_args(std::env::args().skip(1))?;
    let mut config = Config::load()?;
    if let Some(artist) = args.artist {
        config.default_artist = artist;
    }
    if args.no_collocations {
        config.collocations = false;
    }
    let out_dir = args.out.unwrap_or_else(|| config.output_dir.clone());

    let cloud = if let Some(path) = &args.lyrics_file {
        let lyrics = fs_err::read_to_string(path)?;
        WordCloudGenerator::from_config(&config).generate(&lyrics)?
    } else {
        match Pipeline::from_config(&config).visualize(&args.title).await {
            Ok(Outcome::Rendered(vis)) => vis.cloud,
            Ok(Outcome::NotFound) => bail!(
                "Couldn't find lyrics for '{}'. Please check the song title and try again.",
                args.title
            ),
            Err(e @ (Error::NothingToVisualize | Error::Render(_))) => return Err(e.into()),
            Err(e) => bail!("Error fetching lyrics: {e}"),
        }
    };

    let path = export::save_cloud(&out_dir, &args.title, &cloud.png)?;
    if args.json {
        let summary = Summary {
            title: &args.title,
            path: &path,
            width: cloud.width,
            height: cloud.height,
            placed: cloud.placed,
            words: &cloud.ranked,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} ({}x{}, {} words placed)",
        path.display(),
        cloud.width,
        cloud.height,
        cloud.placed
    );
    for entry in cloud.ranked.iter().take(10) {
        println!("  {:>4}  {}", entry.count, entry.word);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        parse_args(args.iter().map(|a| (*a).to_string()))
    }

    #[test]
    fn title_words_are_joined() {
        let args = parse(&["Love", "Story"]).unwrap();
        assert_eq!(args.title, "Love Story");
        assert!(args.artist.is_none());
        assert!(!args.json);
        assert!(!args.no_collocations);
    }

    #[test]
    fn options_mix_with_title_words() {
        let args = parse(&[
            "All",
            "--artist",
            "Phoebe Bridgers",
            "Too",
            "--out",
            "/tmp/clouds",
            "Well",
            "--lyrics-file",
            "song.txt",
            "--json",
            "--no-collocations",
        ])
        .unwrap();
        assert_eq!(args.title, "All Too Well");
        assert_eq!(args.artist.as_deref(), Some("Phoebe Bridgers"));
        assert_eq!(args.out, Some(PathBuf::from("/tmp/clouds")));
        assert_eq!(args.lyrics_file, Some(PathBuf::from("song.txt")));
        assert!(args.json);
        assert!(args.no_collocations);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = parse(&["Love Story", "--colour"]).unwrap_err();
        assert!(err.to_string().contains("unknown option --colour"), "got {err}");
    }

    #[test]
    fn option_without_value_is_rejected() {
        let err = parse(&["Love Story", "--artist"]).unwrap_err();
        assert!(err.to_string().contains("--artist needs a value"), "got {err}");
        assert!(parse(&["Love Story", "--out"]).is_err());
        assert!(parse(&["Love Story", "--lyrics-file"]).is_err());
    }

    #[test]
    fn blank_title_is_rejected() {
        let cases: [&[&str]; 3] = [&[], &["  "], &["--json"]];
        for args in cases {
            let err = parse(args).unwrap_err();
            assert!(err.to_string().starts_with("usage: render_cloud"), "got {err}");
        }
    }
}
