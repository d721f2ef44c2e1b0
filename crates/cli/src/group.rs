use std::path::{Path, PathBuf};
use std::sync::Arc;

use lsif_bundle_core::{
    BundleConfig, BundleError, CancellationToken, GroupedBundleDataMaps, State,
    group_bundle_data,
};
use tracing::{info, warn};

use crate::summary::print_summary;

pub struct GroupArgs {
    pub state: PathBuf,
    pub dump_id: i64,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub channel_capacity: Option<usize>,
    pub strict: bool,
}

pub async fn run(args: GroupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BundleConfig::from_env().with_dump_id(args.dump_id);
    if let Some(capacity) = args.channel_capacity {
        config = config.with_channel_capacity(capacity);
    }

    let cancel_token = CancellationToken::new();
    let ctrl_c = {
        let cancel_token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling bundle build");
                cancel_token.cancel();
            }
        })
    };

    let result = build_bundle(&args.state, &config, args.strict, cancel_token).await;
    ctrl_c.abort();
    let bundle = result?;

    print_summary(&bundle.summary());

    if let Some(output) = args.output {
        write_bundle(&bundle, &output, args.json)?;
        info!("Bundle written to {}", output.display());
    }

    Ok(())
}

pub(crate) async fn build_bundle(
    state_path: &Path,
    config: &BundleConfig,
    strict: bool,
    cancel_token: CancellationToken,
) -> Result<GroupedBundleDataMaps, BundleError> {
    info!("Loading state from {}", state_path.display());
    let state = State::from_json_file(state_path)?;
    if strict {
        state.validate()?;
    }

    let chans = group_bundle_data(Arc::new(state), config, cancel_token).await?;
    chans.into_maps().await
}

fn write_bundle(
    bundle: &GroupedBundleDataMaps,
    output: &Path,
    json: bool,
) -> Result<(), BundleError> {
    if json {
        bundle.save_to_json(output)
    } else {
        bundle.save(output)
    }
}
