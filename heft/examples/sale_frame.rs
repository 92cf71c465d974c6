//! Build a sale and answer a host proxy exchange, printing each frame

use heft::{ChallengeResponse, Dispatcher, HostRequest, HostResponse, Inbound, Request, Status};
use tracing_subscriber::EnvFilter;

fn main() -> heft::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()))
        .init();

    // Amount and currency from the environment, in minor units
    let currency = std::env::var("SALE_CURRENCY").unwrap_or_else(|_| "USD".to_string());
    let amount = std::env::var("SALE_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(12345);

    let init = Request::init().encode()?;
    println!("init:  {}", hex::encode_upper(init.as_bytes()));

    let sale = Request::sale(&currency, amount, true)?.encode()?;
    println!("sale:  {}", hex::encode_upper(sale.as_bytes()));

    // Pretend the terminal asked us to open a host connection
    let connect = heft::ConnectRequest {
        remote_address: heft::Bytes::from_static(b"acquirer.example"),
        port: 443,
        timeout: 30,
    }
    .encode()?;

    match Dispatcher::new().decode(connect.into_bytes())? {
        Inbound::Host(HostRequest::Connect(request)) => {
            println!("terminal wants {}:{}", request.remote_address_text(), request.port);
            let reply = HostResponse::Connect { status: Status::SUCCESS }.encode()?;
            println!("reply: {}", hex::encode_upper(reply.as_bytes()));
        }
        other => println!("unexpected: {:?}", other),
    }

    let challenge = ChallengeResponse::new(vec![0x01u8, 0x02], vec![0x03u8]).encode()?;
    println!("challenge: {}", hex::encode_upper(challenge.as_bytes()));

    Ok(())
}
