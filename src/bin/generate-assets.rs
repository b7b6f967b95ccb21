#![forbid(unsafe_code)]

//! Writes the distributable extras under `dist/`: shell completions, a man
//! page that documents the source layout, and an annotated `trackhub.toml`.

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use hubtree::cli::{layout_help, Args};
use hubtree::overrides::{self, Overrides, OVERRIDES_FILE};
use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let out_dir = PathBuf::from("dist");
    let completions_dir = out_dir.join("completions");
    let man_dir = out_dir.join("man");

    fs::create_dir_all(&completions_dir)?;
    fs::create_dir_all(&man_dir)?;

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        let mut cmd = Args::command();
        generate_to(shell, &mut cmd, "hubtree", &completions_dir)?;
    }

    let man = Man::new(Args::command().after_long_help(layout_help()));
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(man_dir.join("hubtree.1"), buffer)?;

    let example = overrides::example();
    Overrides::parse(&example)
        .map_err(|e| anyhow::anyhow!("generated {OVERRIDES_FILE} does not parse: {e}"))?;
    let example_path = out_dir.join(format!("{OVERRIDES_FILE}.example"));
    fs::write(&example_path, example)?;

    eprintln!(
        "wrote completions, man page and {} under {}",
        example_path.display(),
        out_dir.display()
    );
    Ok(())
}
