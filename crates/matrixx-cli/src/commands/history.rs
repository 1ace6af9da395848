use chrono::Utc;
use matrixx_core::catalog::recent_chats;
use matrixx_core::format::{format_relative, truncate_title};

const TITLE_WIDTH: usize = 40;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let chats = recent_chats(now);

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    for chat in &chats {
        println!(
            "{:>3}  {:<43} {:<13} {}",
            chat.id,
            truncate_title(&chat.title, TITLE_WIDTH),
            chat.tool,
            format_relative(chat.timestamp, now)
        );
    }
    Ok(())
}
