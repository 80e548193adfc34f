use clap::Args;
use keyrace::bijoy;
use keyrace::error::KrResult;

#[derive(Args, Debug, Clone)]
pub struct TransliterateArgs {
    /// Raw Bijoy keys, e.g. "dj" for কি.
    pub keys: String,
}

pub fn run(args: TransliterateArgs) -> KrResult<()> {
    println!("{}", bijoy::transliterate(&args.keys));
    Ok(())
}
