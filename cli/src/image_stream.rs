use anyhow::{Context, Result};
use clap::Subcommand;
use tnb_model::OpenshiftClient;

#[derive(Debug, Subcommand)]
pub(crate) enum ImageStream {
    /// Wait until an image stream lists a tag.
    Wait {
        /// The name of the image stream.
        name: String,
        /// The tag to wait for.
        tag: String,
    },
}

impl ImageStream {
    pub(crate) async fn run(self, client: OpenshiftClient) -> Result<()> {
        match self {
            ImageStream::Wait { name, tag } => client
                .wait_for_image_stream(&name, &tag)
                .await
                .context(format!("Image stream '{}:{}' is not available", name, tag)),
        }
    }
}
