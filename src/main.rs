use std::io::{self, BufRead, BufReader, Read, Write};

use anyhow::{Context, Result, bail};
use emacs_navigator::lsp::handler::handle_request;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] != "--stdio" {
        bail!("Expected --stdio as argument");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin.lock());
    let mut writer = stdout.lock();
    let mut buffer = String::new();

    loop {
        // --- Parse headers ---
        let mut content_length = 0;
        loop {
            buffer.clear();
            if reader.read_line(&mut buffer).context("Reading header")? == 0 {
                return Ok(()); // EOF
            }
            if buffer == "\r\n" {
                break; // End of headers
            }
            if buffer.to_lowercase().starts_with("content-length:") {
                let parts: Vec<&str> = buffer.split(':').collect();
                content_length = parts[1].trim().parse::<usize>().unwrap_or(0);
            }
        }

        if content_length == 0 {
            eprintln!("Invalid Content-Length");
            continue;
        }

        // --- Read the JSON payload ---
        let mut content = vec![0u8; content_length];
        reader.read_exact(&mut content).context("Reading message body")?;

        let request_str = String::from_utf8_lossy(&content);

        if let Some(response) = handle_request(&request_str) {
            let response_bytes = response.as_bytes();
            let header = format!("Content-Length: {}\r\n\r\n", response_bytes.len());
            writer.write_all(header.as_bytes())?;
            writer.write_all(response_bytes)?;
            writer.flush()?;
        }
    }
}
