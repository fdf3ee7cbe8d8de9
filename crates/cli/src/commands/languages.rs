use anyhow::Result;
use debugfile_core::ProviderRegistry;

pub fn languages_command() -> Result<()> {
    for language in ProviderRegistry::new().supported_languages() {
        println!("{}", language);
    }
    Ok(())
}
