use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::ui;
use crate::client::{RateApi, RateClient, View};

const HELP: &str = "\
Commands:
  base CODE                 switch the base currency and reload rates
  from CODE | to CODE       select the conversion currencies
  amount N                  set the amount to convert
  convert [AMOUNT FROM TO]  convert the amount between the selected currencies
  rates                     show the rate table again
  chart                     show the trend chart again
  help                      show this help
  quit                      exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    Base(String),
    From(String),
    To(String),
    Amount(String),
    Convert,
    ConvertWith {
        amount: String,
        from: String,
        to: String,
    },
    Rates,
    Chart,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ClientCommand, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = match parts.as_slice() {
        ["base", code] => ClientCommand::Base(code.to_string()),
        ["from", code] => ClientCommand::From(code.to_string()),
        ["to", code] => ClientCommand::To(code.to_string()),
        ["amount", amount] => ClientCommand::Amount(amount.to_string()),
        ["convert"] => ClientCommand::Convert,
        ["convert", amount, from, to] => ClientCommand::ConvertWith {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        },
        ["rates"] => ClientCommand::Rates,
        ["chart"] => ClientCommand::Chart,
        ["help"] | ["?"] => ClientCommand::Help,
        ["quit"] | ["exit"] | ["q"] => ClientCommand::Quit,
        [] => return Err("Type a command, or 'help'".to_string()),
        _ => return Err(format!("Unknown command: {}. Type 'help'.", line.trim())),
    };
    Ok(command)
}

/// Runs the client against stdin until `quit` or end of input.
pub async fn run<A: RateApi, V: View>(client: &mut RateClient<A, V>) -> Result<()> {
    client.init().await;
    println!("\n{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", ui::style_text(&message, ui::StyleType::Subtle));
                continue;
            }
        };

        // Client errors are already shown by the view.
        match command {
            ClientCommand::Base(code) => {
                let _ = client.change_base(&code).await;
            }
            ClientCommand::From(code) => {
                let _ = client.select_from(&code);
            }
            ClientCommand::To(code) => {
                let _ = client.select_to(&code);
            }
            ClientCommand::Amount(amount) => client.set_amount(&amount),
            ClientCommand::Convert => {
                let _ = client.convert().await;
            }
            ClientCommand::ConvertWith { amount, from, to } => {
                let _ = client.convert_amount(&amount, &from, &to).await;
            }
            ClientCommand::Rates => client.show_rates(),
            ClientCommand::Chart => client.show_trend(),
            ClientCommand::Help => println!("{HELP}"),
            ClientCommand::Quit => break,
        }
    }
    Ok(())
}
