use std::io::{IsTerminal, Write};

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use wheel_bot::WheelHandler;

use crate::console::ConsoleReplier;

pub async fn run(handler: &WheelHandler) -> Result<(), String> {
    let interactive = std::io::stdin().is_terminal();
    let replier = ConsoleReplier::new();

    if interactive {
        println!("  {} wheel session", "Starting".bold());
        println!("  Type 'help' for commands, 'quit' to exit.\n");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush().map_err(|e| e.to_string())?;
        }

        let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? else {
            break; // EOF
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }

        tracing::debug!(input, "repl command");
        if let Err(e) = handler.handle(input, &replier).await {
            println!("{}", e.to_string().yellow());
        }
        if interactive {
            println!();
        }
    }

    tracing::debug!("repl session ended");
    Ok(())
}
