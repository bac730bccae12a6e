//! Diagram requests and their decoded parameters.
//!
//! A lesson page asks for a diagram with a [`DiagramRequest`]: a tool name
//! and a loosely-typed JSON parameter object. The tool name resolves to a
//! [`VariantTag`]; the parameters decode into the matching
//! [`VariantParameters`] case, with documented defaults applied for every
//! omitted optional field.

use std::{fmt, str::FromStr};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::LessonVizError,
    params::without_null_fields,
    layout::{
        cartesian::CartesianParams,
        function_graph::FunctionGraphParams,
        number_line::NumberLineParams,
        opposite_angles::OppositeAnglesParams,
        percentage_bar::PercentageBarParams,
        percentage_grid::PercentageGridParams,
        set::{DisplayMode, SetParams},
        stacked_bar::StackedBarParams,
        unitary_table::UnitaryTableParams,
    },
};

/// The registered diagram variants, one per tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantTag {
    SetVisualizer,
    SetBox,
    SetCircle,
    PercentageGrid,
    PercentageBar,
    PercentageStackedBar,
    UnitaryMethodTable,
    NumberLine,
    CartesianPlane,
    FunctionGraph,
    VerticallyOppositeAngles,
}

impl VariantTag {
    /// Every registered variant, in registry order.
    pub const ALL: [VariantTag; 11] = [
        Self::SetVisualizer,
        Self::SetBox,
        Self::SetCircle,
        Self::PercentageGrid,
        Self::PercentageBar,
        Self::PercentageStackedBar,
        Self::UnitaryMethodTable,
        Self::NumberLine,
        Self::CartesianPlane,
        Self::FunctionGraph,
        Self::VerticallyOppositeAngles,
    ];

    /// Returns the tool name lesson content uses for this variant.
    pub fn name(self) -> &'static str {
        match self {
            Self::SetVisualizer => "setVisualizer",
            Self::SetBox => "setBox",
            Self::SetCircle => "setCircle",
            Self::PercentageGrid => "percentageGrid",
            Self::PercentageBar => "percentageBar",
            Self::PercentageStackedBar => "percentageStackedBar",
            Self::UnitaryMethodTable => "unitaryMethodTable",
            Self::NumberLine => "numberLine",
            Self::CartesianPlane => "cartesianPlane",
            Self::FunctionGraph => "functionGraph",
            Self::VerticallyOppositeAngles => "verticallyOppositeAngles",
        }
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariantTag {
    type Err = LessonVizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| LessonVizError::UnknownVariant {
                tool_name: s.to_string(),
            })
    }
}

fn empty_parameters() -> Value {
    Value::Object(serde_json::Map::new())
}

/// A declarative request for one diagram.
///
/// # Examples
///
/// ```
/// use lessonviz::request::{DiagramRequest, VariantTag};
///
/// let request = DiagramRequest::from_json(
///     r#"{"toolName": "setBox", "parameters": {"setName": "A", "elements": ["1", "2"]}}"#,
/// )
/// .unwrap();
/// assert_eq!(request.tool_name(), "setBox");
/// assert_eq!(request.variant().unwrap(), VariantTag::SetBox);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRequest {
    tool_name: String,
    #[serde(default = "empty_parameters")]
    parameters: Value,
    #[serde(default)]
    caption: Option<String>,
}

impl DiagramRequest {
    /// Creates a request from a tool name and a parameter object.
    pub fn new(tool_name: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
            caption: None,
        }
    }

    /// Decodes a request from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`LessonVizError::Json`] when the input is not a JSON request
    /// object. The tool name and parameters are not checked here.
    pub fn from_json(json: &str) -> Result<Self, LessonVizError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns this request with a request-level caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Returns the request-level caption, used when the parameters carry none.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Resolves the tool name to a registered variant.
    pub fn variant(&self) -> Result<VariantTag, LessonVizError> {
        self.tool_name.parse()
    }
}

/// Typed parameters of one variant, with defaults applied.
#[derive(Debug, Clone)]
pub enum VariantParameters {
    /// Shared by `setVisualizer`, `setBox` and `setCircle`; the latter two
    /// force their display mode.
    Set(SetParams),
    PercentageGrid(PercentageGridParams),
    PercentageBar(PercentageBarParams),
    PercentageStackedBar(StackedBarParams),
    UnitaryMethodTable(UnitaryTableParams),
    NumberLine(NumberLineParams),
    CartesianPlane(CartesianParams),
    FunctionGraph(FunctionGraphParams),
    VerticallyOppositeAngles(OppositeAnglesParams),
}

impl VariantParameters {
    /// Decodes the parameter object of a request for the given variant.
    ///
    /// A `null` parameter object is treated like an empty one, and a `null`
    /// member like a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`LessonVizError::MalformedParameters`] when a required field
    /// is missing or a field has the wrong type.
    pub fn decode(tag: VariantTag, parameters: &Value) -> Result<Self, LessonVizError> {
        let parameters = if parameters.is_null() {
            empty_parameters()
        } else {
            without_null_fields(parameters)
        };
        let parameters = &parameters;

        let decoded = match tag {
            VariantTag::SetVisualizer => Self::Set(decode_as(tag, parameters)?),
            VariantTag::SetBox => Self::Set(
                decode_as::<SetParams>(tag, parameters)?.with_display_mode(DisplayMode::Box),
            ),
            VariantTag::SetCircle => Self::Set(
                decode_as::<SetParams>(tag, parameters)?.with_display_mode(DisplayMode::Circle),
            ),
            VariantTag::PercentageGrid => Self::PercentageGrid(decode_as(tag, parameters)?),
            VariantTag::PercentageBar => Self::PercentageBar(decode_as(tag, parameters)?),
            VariantTag::PercentageStackedBar => {
                Self::PercentageStackedBar(decode_as(tag, parameters)?)
            }
            VariantTag::UnitaryMethodTable => Self::UnitaryMethodTable(decode_as(tag, parameters)?),
            VariantTag::NumberLine => Self::NumberLine(decode_as(tag, parameters)?),
            VariantTag::CartesianPlane => Self::CartesianPlane(decode_as(tag, parameters)?),
            VariantTag::FunctionGraph => Self::FunctionGraph(decode_as(tag, parameters)?),
            VariantTag::VerticallyOppositeAngles => {
                Self::VerticallyOppositeAngles(decode_as(tag, parameters)?)
            }
        };
        Ok(decoded)
    }

    /// Returns the caption carried by the parameters, if any.
    pub fn caption(&self) -> Option<&str> {
        match self {
            Self::Set(params) => params.caption(),
            Self::PercentageGrid(params) => params.caption(),
            Self::PercentageBar(params) => params.caption(),
            Self::PercentageStackedBar(params) => params.caption(),
            Self::UnitaryMethodTable(params) => params.caption(),
            Self::NumberLine(params) => params.caption(),
            Self::CartesianPlane(params) => params.caption(),
            Self::FunctionGraph(params) => params.caption(),
            Self::VerticallyOppositeAngles(params) => params.caption(),
        }
    }
}

fn decode_as<T: DeserializeOwned>(tag: VariantTag, value: &Value) -> Result<T, LessonVizError> {
    T::deserialize(value).map_err(|err| LessonVizError::malformed(tag, err.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_variant_tag_round_trips_every_name() {
        for tag in VariantTag::ALL {
            assert_eq!(tag.name().parse::<VariantTag>().unwrap(), tag);
            assert_eq!(tag.to_string(), tag.name());
        }
    }

    #[test]
    fn test_unknown_tool_name() {
        let err = "pieChart".parse::<VariantTag>().unwrap_err();
        assert!(matches!(
            err,
            LessonVizError::UnknownVariant { ref tool_name } if tool_name == "pieChart"
        ));
    }

    #[test]
    fn test_tool_names_are_case_sensitive() {
        assert!("SetBox".parse::<VariantTag>().is_err());
    }

    #[test]
    fn test_request_from_json_defaults_parameters() {
        let request = DiagramRequest::from_json(r#"{"toolName": "percentageGrid"}"#).unwrap();
        assert_eq!(request.parameters(), &json!({}));
        assert_eq!(request.caption(), None);
    }

    #[test]
    fn test_request_from_json_reads_caption() {
        let request = DiagramRequest::from_json(
            r#"{"toolName": "setBox", "parameters": {}, "caption": "Factors of 12"}"#,
        )
        .unwrap();
        assert_eq!(request.caption(), Some("Factors of 12"));
    }

    #[test]
    fn test_request_from_json_rejects_garbage() {
        let err = DiagramRequest::from_json("not json").unwrap_err();
        assert!(matches!(err, LessonVizError::Json(_)));
    }

    #[test]
    fn test_decode_forces_set_display_mode() {
        let params = json!({"elements": ["1"], "displayMode": "list"});

        let VariantParameters::Set(set) = VariantParameters::decode(VariantTag::SetBox, &params).unwrap()
        else {
            panic!("expected set parameters");
        };
        assert_eq!(set.display_mode(), DisplayMode::Box);

        let VariantParameters::Set(set) =
            VariantParameters::decode(VariantTag::SetCircle, &params).unwrap()
        else {
            panic!("expected set parameters");
        };
        assert_eq!(set.display_mode(), DisplayMode::Circle);

        let VariantParameters::Set(set) =
            VariantParameters::decode(VariantTag::SetVisualizer, &params).unwrap()
        else {
            panic!("expected set parameters");
        };
        assert_eq!(set.display_mode(), DisplayMode::List);
    }

    #[test]
    fn test_decode_null_parameters_as_empty() {
        let decoded = VariantParameters::decode(VariantTag::NumberLine, &Value::Null).unwrap();
        assert!(matches!(decoded, VariantParameters::NumberLine(_)));
    }

    #[test]
    fn test_decode_null_members_take_defaults() {
        let params = json!({
            "setName": null,
            "elements": null,
            "displayMode": null,
            "showBraces": null,
            "caption": null,
        });
        let VariantParameters::Set(set) =
            VariantParameters::decode(VariantTag::SetVisualizer, &params).unwrap()
        else {
            panic!("expected set parameters");
        };
        assert_eq!(set.set_name(), "A");
        assert!(set.elements().is_empty());
        assert_eq!(set.display_mode(), DisplayMode::List);
        assert_eq!(set.caption(), None);

        let decoded = VariantParameters::decode(
            VariantTag::PercentageBar,
            &json!({"bars": [{"label": null, "segments": [{"percentage": 40, "label": null}]}]}),
        );
        assert!(decoded.is_ok());
    }

    #[test]
    fn test_decode_null_required_field_is_malformed() {
        let err = VariantParameters::decode(VariantTag::FunctionGraph, &json!({"expression": null}))
            .unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::FunctionGraph));
    }

    #[test]
    fn test_decode_missing_required_field_is_malformed() {
        let err = VariantParameters::decode(VariantTag::FunctionGraph, &json!({})).unwrap_err();
        assert!(matches!(
            err,
            LessonVizError::MalformedParameters {
                variant: VariantTag::FunctionGraph,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_wrong_type_is_malformed() {
        let err =
            VariantParameters::decode(VariantTag::SetBox, &json!({"elements": "1, 2, 3"})).unwrap_err();
        assert_eq!(err.variant(), Some(VariantTag::SetBox));
    }

    #[test]
    fn test_parameter_caption() {
        let decoded =
            VariantParameters::decode(VariantTag::PercentageGrid, &json!({"shadedCount": 5, "caption": "5%"}))
                .unwrap();
        assert_eq!(decoded.caption(), Some("5%"));
    }
}
