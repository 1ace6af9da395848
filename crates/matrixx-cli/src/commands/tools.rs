use matrixx_core::{ChatSurfaceConfig, Config, Tool};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolRow {
    id: Tool,
    label: &'static str,
    #[serde(flatten)]
    surface: ChatSurfaceConfig,
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let max_file_size_bytes = Config::load_or_default().chat.max_file_size_bytes;
    let rows: Vec<ToolRow> = Tool::SIDEBAR
        .into_iter()
        .map(|tool| ToolRow {
            id: tool,
            label: tool.label(),
            surface: ChatSurfaceConfig::for_tool(tool, max_file_size_bytes),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        let uploads = if row.surface.file_upload_enabled {
            format!("uploads {}", row.surface.accept_attribute())
        } else {
            "no uploads".to_string()
        };
        println!("{:<14} {:<20} {}", row.id, row.label, uploads);
        println!("{:<14} {}", "", row.surface.placeholder_text);
    }
    Ok(())
}
