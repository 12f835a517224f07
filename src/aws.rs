//! Shared AWS SDK configuration loading.

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;

/// Load credentials and region from the default provider chain.
///
/// `region` takes precedence; `fallback_region` applies only when the chain finds none.
pub async fn load_sdk_config(region: Option<&str>, fallback_region: Option<&str>) -> SdkConfig {
    let mut provider = RegionProviderChain::first_try(region.map(|name| Region::new(name.to_string())))
        .or_default_provider();
    if let Some(fallback) = fallback_region {
        provider = provider.or_else(Region::new(fallback.to_string()));
    }

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(provider)
        .load()
        .await;
    tracing::debug!(region = ?config.region(), "Loaded AWS configuration");
    config
}
