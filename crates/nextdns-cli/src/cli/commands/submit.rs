//! `nextdns-updater submit` - submit one file to one list.

use anyhow::Result;
use nextdns::ListKind;

use super::{submit_lists, Context};
use crate::cli::args::SubmitArgs;

pub async fn execute(ctx: Context, args: SubmitArgs) -> Result<()> {
    let plan = vec![(ListKind::from(args.list), args.file)];
    submit_lists(&ctx, plan, &args.tuning, args.strict).await
}
