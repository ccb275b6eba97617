//! One-shot prompt improvement.

use tracing::info;

use promptassist_protocols::{RewriteError, Rewriter};

use crate::context::AppContext;

pub(crate) async fn improve(
    ctx: &AppContext,
    text: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = text.join(" ");
    let credentials = ctx.credential_store().await?;
    let rewriter = ctx.rewriter(credentials)?;
    info!("Improving prompt with {} ({})", rewriter.id(), rewriter.model());

    let result = rewriter.improve(&prompt).await?;
    if !result.is_valid() {
        return Err(RewriteError::EmptyResponse.into());
    }

    println!("{}", result.enhanced_prompt);
    if !result.analysis.is_empty() {
        println!();
        println!("Analysis: {}", result.analysis);
    }
    Ok(())
}
