//! `pepil prompt`: Print the system prompt exactly as the model receives it.

use std::path::PathBuf;

use pepil_knowledge::{DirectorySource, KnowledgeCompiler, build_prompt};

pub fn run(data_dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(data_dir)?;
    let compiler = KnowledgeCompiler::new(DirectorySource::new(config.knowledge.data_dir));

    print!("{}", build_prompt(compiler.compile()?));

    Ok(())
}
