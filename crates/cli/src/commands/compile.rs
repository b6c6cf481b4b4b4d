//! `pepil compile`: Print or write the compiled knowledge base.

use std::path::PathBuf;

use pepil_knowledge::{DirectorySource, KnowledgeCompiler};

pub fn run(
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(data_dir)?;
    let compiler = KnowledgeCompiler::new(DirectorySource::new(config.knowledge.data_dir));
    let document = compiler.compile()?;

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{document}\n"))
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", document.len(), path.display());
        }
        None => println!("{document}"),
    }

    Ok(())
}
