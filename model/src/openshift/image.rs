use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// An ImageStream tracks the tags (versions) of an image available to the cluster.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, PartialEq, Serialize)]
#[kube(
    group = "image.openshift.io",
    version = "v1",
    kind = "ImageStream",
    namespaced,
    status = "ImageStreamStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ImageStreamSpec {
    #[serde(default)]
    pub tags: Vec<TagReference>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagReference {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStreamStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image_repository: Option<String>,
    #[serde(default)]
    pub tags: Vec<NamedTagEvents>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NamedTagEvents {
    pub tag: String,
}

impl ImageStream {
    /// `true` if the image stream's spec lists `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.spec.tags.iter().any(|t| t.name == tag)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_are_matched_exactly() {
        let stream: ImageStream = serde_json::from_value(json!({
            "apiVersion": "image.openshift.io/v1",
            "kind": "ImageStream",
            "metadata": { "name": "fuse-java-openshift" },
            "spec": {
                "lookupPolicy": { "local": false },
                "tags": [
                    { "name": "1.10", "from": { "kind": "DockerImage", "name": "fuse:1.10" } },
                    { "name": "latest" }
                ]
            }
        }))
        .unwrap();
        assert!(stream.has_tag("1.10"));
        assert!(stream.has_tag("latest"));
        assert!(!stream.has_tag("1.1"));
    }

    #[test]
    fn empty_spec_has_no_tags() {
        let stream: ImageStream = serde_json::from_value(json!({
            "apiVersion": "image.openshift.io/v1",
            "kind": "ImageStream",
            "metadata": { "name": "new-stream" },
            "spec": {}
        }))
        .unwrap();
        assert!(!stream.has_tag("latest"));
    }
}
