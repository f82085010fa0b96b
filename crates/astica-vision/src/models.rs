//! Vision describe models shared by the async and blocking clients.

use astica_core::ApiKey;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Analysis capability requested from the vision service.
///
/// Unknown tokens are kept verbatim in [`VisionParameter::Other`] and passed
/// through to the service unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisionParameter {
    /// A caption describing the image.
    Describe,
    /// Multiple auxiliary captions.
    DescribeAll,
    /// OCR results with positional coordinates.
    TextRead,
    /// Generative description built on the vision result. Slower.
    Gpt,
    /// Detailed generative description. Much slower.
    GptDetailed,
    /// Age and gender of detected faces.
    Faces,
    /// Scores for sensitive content categories.
    Moderate,
    /// Descriptive terms for the image.
    Tags,
    /// Brands and logos.
    Brands,
    /// Celebrities and other known persons.
    Celebrities,
    /// Known locations and landmarks.
    Landmarks,
    /// Detected objects with bounding boxes.
    Objects,
    /// Any other token, sent as-is.
    Other(String),
}

impl VisionParameter {
    /// Every recognized parameter, in documentation order.
    pub const KNOWN: [Self; 12] = [
        Self::Describe,
        Self::DescribeAll,
        Self::TextRead,
        Self::Gpt,
        Self::GptDetailed,
        Self::Faces,
        Self::Moderate,
        Self::Tags,
        Self::Brands,
        Self::Celebrities,
        Self::Landmarks,
        Self::Objects,
    ];

    /// Wire token for this parameter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Describe => "describe",
            Self::DescribeAll => "describe_all",
            Self::TextRead => "text_read",
            Self::Gpt => "gpt",
            Self::GptDetailed => "gpt_detailed",
            Self::Faces => "faces",
            Self::Moderate => "moderate",
            Self::Tags => "tags",
            Self::Brands => "brands",
            Self::Celebrities => "celebrities",
            Self::Landmarks => "landmarks",
            Self::Objects => "objects",
            Self::Other(token) => token,
        }
    }

    /// Returns true for tokens outside the recognized vocabulary.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Other(_))
    }

    /// Join parameters the way the service expects them: `", "` separated,
    /// order preserved.
    #[must_use]
    pub fn join(params: &[Self]) -> String {
        params
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for VisionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisionParameter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == s)
            .unwrap_or_else(|| Self::Other(s.to_string())))
    }
}

impl From<&str> for VisionParameter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(param) => param,
            Err(never) => match never {},
        }
    }
}

impl From<String> for VisionParameter {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Optional settings for the generative description parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeOptions {
    /// Prompt steering the generated description.
    pub gpt_prompt: String,
    /// Desired length of the generated description.
    pub gpt_length: String,
}

impl DescribeOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.gpt_prompt = prompt.into();
        self
    }

    /// Set the desired length.
    #[must_use]
    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.gpt_length = length.into();
        self
    }
}

/// Request payload for the describe operation.
///
/// All six fields are always serialized; absent options become empty strings.
#[derive(Debug, Clone, Serialize)]
pub struct DescribeRequest {
    /// API key.
    #[serde(rename = "tkn", serialize_with = "ApiKey::serialize_exposed")]
    pub token: ApiKey,
    /// Model version.
    #[serde(rename = "modelVersion")]
    pub model_version: String,
    /// Image reference (URL or other encoding accepted by the service).
    pub input: String,
    /// Feature flags joined with `", "`.
    #[serde(rename = "visionParams")]
    pub vision_params: String,
    /// Generative description prompt.
    pub gpt_prompt: String,
    /// Generative description length. The wire name is the service's own.
    #[serde(rename = "gtp_length")]
    pub gpt_length: String,
}

impl DescribeRequest {
    /// Assemble a request.
    #[must_use]
    pub fn new(
        token: ApiKey,
        model_version: impl Into<String>,
        input: impl Into<String>,
        options: Option<DescribeOptions>,
        params: &[VisionParameter],
    ) -> Self {
        let options = options.unwrap_or_default();
        Self {
            token,
            model_version: model_version.into(),
            input: input.into(),
            vision_params: VisionParameter::join(params),
            gpt_prompt: options.gpt_prompt,
            gpt_length: options.gpt_length,
        }
    }
}

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Pixel-space bounding box. Values are passed through without range checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge.
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: i64,
    /// Top edge.
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: i64,
    /// Width.
    #[serde(default, deserialize_with = "null_as_default", rename = "w")]
    pub width: i64,
    /// Height.
    #[serde(default, deserialize_with = "null_as_default", rename = "h")]
    pub height: i64,
}

/// Metadata about the call, echoed by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallInfo {
    /// Request identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub request: String,
    /// Request type.
    #[serde(default, deserialize_with = "null_as_default", rename = "requestType")]
    pub request_type: String,
    /// Model version that handled the call.
    #[serde(default, deserialize_with = "null_as_default", rename = "modelVersion")]
    pub model_version: String,
    /// Usage units charged for the call.
    #[serde(default, deserialize_with = "null_as_default", rename = "api_qty")]
    pub api_quantity: f64,
}

/// Primary caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Caption text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

/// Auxiliary caption, optionally located in the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionCaption {
    /// Caption text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    /// Region the caption refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rectangle: Option<Rectangle>,
}

/// Detected object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Object label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    /// Location of the object.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rectangle: Rectangle,
}

/// Descriptive tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Confidence in `[0, 1]`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Width.
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: i64,
    /// Height.
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: i64,
}

/// Response payload of the describe operation.
///
/// The shape covers every feature; sections for parameters that were not
/// requested stay empty. Output of features without a typed model (faces,
/// moderation, OCR, brands, celebrities, landmarks) is kept in [`Self::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeResponse {
    /// Model version echoed back.
    #[serde(default, deserialize_with = "null_as_default", rename = "modelVersion")]
    pub model_version: String,
    /// Call metadata.
    #[serde(default, deserialize_with = "null_as_default", rename = "astica")]
    pub call: CallInfo,
    /// Status string reported by the service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Generative description (`gpt` / `gpt_detailed`).
    #[serde(default, deserialize_with = "null_as_default", rename = "caption_GPTS")]
    pub caption_gpt: String,
    /// Level of the generative description.
    #[serde(default, deserialize_with = "null_as_default", rename = "GPT_level")]
    pub gpt_level: i64,
    /// Primary caption (`describe`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub caption: Caption,
    /// Auxiliary captions (`describe_all`).
    #[serde(default, deserialize_with = "null_as_default", rename = "caption_list")]
    pub captions: Vec<RegionCaption>,
    /// Detected objects (`objects`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub objects: Vec<DetectedObject>,
    /// Tags (`tags`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Image dimensions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ImageMetadata,
    /// Fields without a typed representation.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DescribeResponse {
    /// Tag names with confidence at or above `threshold`.
    #[must_use]
    pub fn tag_names_above(&self, threshold: f64) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|tag| tag.confidence >= threshold)
            .map(|tag| tag.name.as_str())
            .collect()
    }

    /// Best available caption text: the generative one when present,
    /// otherwise the primary caption.
    #[must_use]
    pub fn best_caption(&self) -> Option<&str> {
        [self.caption_gpt.as_str(), self.caption.text.as_str()]
            .into_iter()
            .find(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("test-key")
    }

    #[test]
    fn vision_parameter_tokens() {
        let tokens: Vec<&str> = VisionParameter::KNOWN.iter().map(VisionParameter::as_str).collect();
        assert_eq!(
            tokens,
            vec![
                "describe",
                "describe_all",
                "text_read",
                "gpt",
                "gpt_detailed",
                "faces",
                "moderate",
                "tags",
                "brands",
                "celebrities",
                "landmarks",
                "objects",
            ]
        );
    }

    #[test]
    fn vision_parameter_parses_known_and_custom() {
        assert_eq!(VisionParameter::from("tags"), VisionParameter::Tags);
        assert_eq!(VisionParameter::from("gpt_detailed"), VisionParameter::GptDetailed);

        let custom = VisionParameter::from("colors".to_string());
        assert!(custom.is_custom());
        assert_eq!(custom.to_string(), "colors");
    }

    #[test]
    fn join_preserves_order() {
        let params = [
            VisionParameter::Tags,
            VisionParameter::Describe,
            VisionParameter::Other("colors".into()),
        ];
        assert_eq!(VisionParameter::join(&params), "tags, describe, colors");
        assert_eq!(VisionParameter::join(&[]), "");
        assert_eq!(VisionParameter::join(&[VisionParameter::Gpt]), "gpt");
    }

    #[test]
    fn request_serializes_all_fields() {
        let request = DescribeRequest::new(
            key(),
            "2.1_full",
            "https://example.com/cat.jpg",
            Some(DescribeOptions::new().with_prompt("be brief").with_length("90")),
            &[VisionParameter::Describe, VisionParameter::Objects],
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tkn": "test-key",
                "modelVersion": "2.1_full",
                "input": "https://example.com/cat.jpg",
                "visionParams": "describe, objects",
                "gpt_prompt": "be brief",
                "gtp_length": "90"
            })
        );
    }

    #[test]
    fn request_without_options_uses_empty_strings() {
        let request = DescribeRequest::new(key(), "2.1_full", "img", None, &[]);
        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 6);
        assert_eq!(object["gpt_prompt"], "");
        assert_eq!(object["gtp_length"], "");
        assert_eq!(object["visionParams"], "");
    }

    #[test]
    fn request_debug_hides_token() {
        let request = DescribeRequest::new(ApiKey::new("hidden-key"), "2.1_full", "img", None, &[]);
        assert!(!format!("{request:?}").contains("hidden-key"));
    }

    #[test]
    fn empty_response_defaults() {
        let response: DescribeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, DescribeResponse::default());
        assert!(response.best_caption().is_none());
    }

    #[test]
    fn rectangle_uses_short_wire_names() {
        let rect: Rectangle = serde_json::from_str(r#"{"x":-4,"y":2,"w":30,"h":40}"#).unwrap();
        assert_eq!(
            rect,
            Rectangle {
                x: -4,
                y: 2,
                width: 30,
                height: 40
            }
        );
    }

    #[test]
    fn caption_without_rectangle() {
        let caption: RegionCaption =
            serde_json::from_str(r#"{"text":"a dog","confidence":0.5}"#).unwrap();
        assert!(caption.rectangle.is_none());
    }

    #[test]
    fn null_sections_decode_as_empty() {
        let bodies = [
            r#"{"tags":null}"#,
            r#"{"caption_list":null}"#,
            r#"{"objects":[{"name":"dog","confidence":0.5,"rectangle":null}]}"#,
            r#"{"caption_GPTS":null,"GPT_level":null}"#,
            r#"{"astica":null,"caption":null,"metadata":null}"#,
            r#"{"astica":{"request":null,"api_qty":null},"caption":{"text":null,"confidence":null}}"#,
        ];
        for body in bodies {
            let response: DescribeResponse = serde_json::from_str(body)
                .unwrap_or_else(|e| panic!("Failed to decode {body}: {e}"));
            assert!(response.tags.is_empty());
            assert!(response.captions.is_empty());
            assert!(response.caption_gpt.is_empty());
            assert_eq!(response.gpt_level, 0);
            assert_eq!(response.call, CallInfo::default());
            assert_eq!(response.caption, Caption::default());
            assert_eq!(response.metadata, ImageMetadata::default());
        }

        let response: DescribeResponse = serde_json::from_str(bodies[2]).unwrap();
        assert_eq!(response.objects[0].name, "dog");
        assert_eq!(response.objects[0].rectangle, Rectangle::default());
    }

    #[test]
    fn negative_dimensions_are_passed_through() {
        let response: DescribeResponse =
            serde_json::from_str(r#"{"metadata":{"width":-1,"height":480}}"#).unwrap();
        assert_eq!(response.metadata.width, -1);
        assert_eq!(response.metadata.height, 480);
    }

    #[test]
    fn unknown_fields_are_kept() {
        let response: DescribeResponse =
            serde_json::from_str(r#"{"status":"success","faces":[{"age":31,"gender":"Male"}]}"#)
                .unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(response.extra["faces"][0]["age"], 31);
    }

    #[test]
    fn best_caption_prefers_generative_text() {
        let mut response = DescribeResponse {
            caption: Caption {
                text: "a cat".into(),
                confidence: 0.9,
            },
            ..DescribeResponse::default()
        };
        assert_eq!(response.best_caption(), Some("a cat"));

        response.caption_gpt = "A tabby cat sleeping on a sofa.".into();
        assert_eq!(response.best_caption(), Some("A tabby cat sleeping on a sofa."));
    }

    #[test]
    fn tag_names_above_threshold() {
        let response = DescribeResponse {
            tags: vec![
                Tag {
                    name: "cat".into(),
                    confidence: 0.98,
                },
                Tag {
                    name: "indoor".into(),
                    confidence: 0.4,
                },
            ],
            ..DescribeResponse::default()
        };
        assert_eq!(response.tag_names_above(0.5), vec!["cat"]);
    }
}
