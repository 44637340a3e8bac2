//! `nextdns-updater sync` - submit the configured allowlist and denylist files.

use anyhow::Result;
use nextdns::ListKind;

use super::{submit_lists, Context};
use crate::cli::args::SyncArgs;

pub async fn execute(ctx: Context, args: SyncArgs) -> Result<()> {
    let lists = match args.only {
        Some(only) => vec![ListKind::from(only)],
        None => ListKind::ALL.to_vec(),
    };

    let plan = lists
        .into_iter()
        .map(|kind| (kind, ctx.config.files.for_list(kind).to_path_buf()))
        .collect();

    submit_lists(&ctx, plan, &args.tuning, args.strict).await
}
