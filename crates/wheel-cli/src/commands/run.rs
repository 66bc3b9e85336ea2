use wheel_bot::WheelHandler;

use crate::console::ConsoleReplier;

pub async fn run(handler: &WheelHandler, input: &str) -> Result<(), String> {
    handler
        .handle(input, &ConsoleReplier::new())
        .await
        .map_err(|e| e.to_string())
}
