//! sockrpc CLI — talk to a socket RPC endpoint from the terminal.
//!
//! Usage:
//! ```bash
//! # Send a JSON-RPC call over WebSocket
//! sockrpc call --url wss://mainnet.example.com/ws --method eth_blockNumber
//!
//! # Stream a subscription (new block headers)
//! sockrpc watch --url wss://mainnet.example.com/ws --kind newHeads
//! ```

use std::env;
use std::process;
use std::sync::Arc;

use serde_json::Value;

use sockrpc_provider::{EthereumProvider, SocketProvider};
use sockrpc_ws::WsConnection;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "call" => cmd_call(&args[2..]).await,
        "watch" => cmd_watch(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("sockrpc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("sockrpc {}", env!("CARGO_PKG_VERSION"));
    println!("Talk to socket RPC endpoints from the terminal\n");
    println!("USAGE:");
    println!("    sockrpc <COMMAND>\n");
    println!("COMMANDS:");
    println!("    call       Send a JSON-RPC call over a socket connection");
    println!("    watch      Subscribe to an event stream and print payloads");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("CALL FLAGS:");
    println!("    --url <URL>        WebSocket endpoint URL  [required]");
    println!("    --method <NAME>    JSON-RPC method name    [required]");
    println!("    --params <JSON>    Parameters as a JSON array (default [])\n");
    println!("WATCH FLAGS:");
    println!("    --url <URL>        WebSocket endpoint URL  [required]");
    println!("    --kind <KIND>      Subscription kind, e.g. newHeads, logs  [required]");
}

async fn connect_provider(url: &str) -> Result<EthereumProvider<WsConnection>, String> {
    let connection = WsConnection::connect_default(url)
        .await
        .map_err(|e| e.to_string())?;
    let provider = EthereumProvider::new(Arc::new(connection));
    provider.register_event_listeners();
    Ok(provider)
}

async fn cmd_call(args: &[String]) -> Result<(), String> {
    let url = parse_flag(args, "--url").ok_or("--url is required")?;
    let method = parse_flag(args, "--method").ok_or("--method is required")?;
    let params = match parse_flag(args, "--params") {
        Some(raw) => serde_json::from_str::<Vec<Value>>(&raw)
            .map_err(|e| format!("--params must be a JSON array: {e}"))?,
        None => vec![],
    };

    let provider = connect_provider(&url).await?;
    let response = provider
        .send(&method, params)
        .await
        .map_err(|e| e.to_string())?;

    let result = response.get("result").cloned().unwrap_or(Value::Null);
    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    Ok(())
}

async fn cmd_watch(args: &[String]) -> Result<(), String> {
    let url = parse_flag(args, "--url").ok_or("--url is required")?;
    let kind = parse_flag(args, "--kind").ok_or("--kind is required")?;

    let provider = connect_provider(&url).await?;

    let response = provider
        .send("eth_subscribe", vec![Value::String(kind.clone())])
        .await
        .map_err(|e| e.to_string())?;
    let subscription_id = response
        .get("result")
        .and_then(Value::as_str)
        .ok_or("node returned no subscription id")?
        .to_string();

    provider.subscriptions().activate(&subscription_id);
    let mut events = provider.on(&subscription_id);
    let mut closes = provider.on("close");

    println!("Subscribed to {kind} ({subscription_id}), streaming... (Ctrl-C to stop)");

    loop {
        tokio::select! {
            payload = events.recv() => {
                match payload {
                    Some(payload) => {
                        let result = payload.get("result").cloned().unwrap_or(payload);
                        println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
                    }
                    None => return Err("event stream ended".into()),
                }
            }
            reason = closes.recv() => {
                tracing::warn!(?reason, "connection closed");
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping.");
                return Ok(());
            }
        }
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}
