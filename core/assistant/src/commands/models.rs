//! models: 利用可能なモデルの一覧を表示する

use common::error::Error;
use common::llm::build_client;

pub fn run() -> Result<i32, Error> {
    let client = build_client()?;

    println!("Fetching available models...");
    println!();
    let models = client.list_models()?;

    println!("Available Models:");
    println!();
    for model in models {
        println!("{}", model.display_name_or_name());
        println!("  Name: {}", model.name);
        println!("  Description: {}", model.description);
        println!();
    }
    Ok(0)
}
