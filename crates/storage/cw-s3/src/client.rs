//! S3 client construction.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use cw_types::S3Config;

/// Create an S3 client from configuration.
///
/// When a custom endpoint is configured (LocalStack), path-style addressing
/// is forced because virtual-hosted-style bucket DNS does not resolve there.
pub async fn build_client(config: &S3Config) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    let builder = aws_sdk_s3::config::Builder::from(&sdk_config);

    let s3_config = if config.endpoint_url.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    Client::from_conf(s3_config)
}
