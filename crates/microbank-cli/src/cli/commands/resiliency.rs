//! `microbank resiliency` – drive one call shape against the fault-injection service.

use anyhow::Result;
use microbank_core::adapter::ResiliencyAdapter;
use microbank_core::domain::FaultParams;
use microbank_core::CallContext;

use crate::cli::Shape;

pub async fn run_resiliency(
    resiliency: &ResiliencyAdapter,
    ctx: &CallContext,
    shape: Shape,
    params: &FaultParams,
    count: usize,
) -> Result<()> {
    tracing::info!(?shape, ?params, count, "resiliency run");
    match shape {
        Shape::Unary => {
            let reply = resiliency.unary(ctx, params).await?;
            println!("{reply}");
        }
        Shape::ServerStream => {
            let received = resiliency
                .server_stream(ctx, params, |reply| println!("{reply}"))
                .await?;
            println!("{received} message(s) received");
        }
        Shape::ClientStream => {
            let reply = resiliency.client_stream(ctx, params, count).await?;
            println!("{reply}");
        }
        Shape::Bidi => {
            let summary = resiliency
                .bidi(ctx, params, count, |reply| println!("{reply}"))
                .await?;
            println!(
                "{} request(s) sent, {} response(s) received",
                summary.sent, summary.received
            );
        }
    }
    Ok(())
}
