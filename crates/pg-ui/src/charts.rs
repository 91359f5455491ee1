//! Chart figure builders
//!
//! Figures are plain serialisable documents in the charting library's
//! `{data, layout}` shape, ready to hand to a graph component.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Chart-building failures
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// Record lacks a required field
    #[error("record is missing '{0}'")]
    MissingField(String),

    /// Field present but of the wrong shape
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    /// Attribute codes and display names differ in length
    #[error("{codes} attribute codes but {names} attribute names")]
    LengthMismatch { codes: usize, names: usize },
}

/// Figure document: traces plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// One JSON object per trace
    pub data: Vec<Value>,
    /// Layout object
    pub layout: Value,
}

/// Axis and title text for [`force_plot`]
#[derive(Debug, Clone)]
pub struct ForcePlotLabels {
    /// Figure title
    pub title: String,
    /// Horizontal axis label
    pub x_axis: String,
    /// Vertical axis label
    pub y_axis: String,
}

impl Default for ForcePlotLabels {
    fn default() -> Self {
        Self {
            title: "Attribute Forces".to_string(),
            x_axis: "Probability/%".to_string(),
            y_axis: "Attribute".to_string(),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Waterfall-style plot of per-attribute contributions to a probability
///
/// `record` must hold `shap_probs`: the running probability after the base
/// and after each attribute (so one more entry than `attr_codes`), plus
/// `"{code}#value"` for each attribute code, shown as bar text.
///
/// # Errors
/// Returns error if `record` lacks the fields above or the lengths disagree.
pub fn force_plot(
    attr_codes: &[&str],
    attr_names: &[&str],
    record: &Map<String, Value>,
    labels: &ForcePlotLabels,
) -> Result<Figure, ChartError> {
    if attr_codes.len() != attr_names.len() {
        return Err(ChartError::LengthMismatch {
            codes: attr_codes.len(),
            names: attr_names.len(),
        });
    }

    let probs: Vec<f64> = record
        .get("shap_probs")
        .ok_or_else(|| ChartError::MissingField("shap_probs".to_string()))?
        .as_array()
        .ok_or_else(|| ChartError::InvalidField {
            field: "shap_probs".to_string(),
            reason: "not an array".to_string(),
        })?
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| ChartError::InvalidField {
                field: "shap_probs".to_string(),
                reason: format!("non-numeric entry {v}"),
            })
        })
        .collect::<Result<_, _>>()?;

    if probs.len() != attr_codes.len() + 1 || probs.len() < 2 {
        return Err(ChartError::InvalidField {
            field: "shap_probs".to_string(),
            reason: format!("expected {} entries, found {}", attr_codes.len() + 1, probs.len()),
        });
    }

    let bases: Vec<f64> = probs[..probs.len() - 1].iter().map(|b| b * 100.0).collect();
    let steps: Vec<f64> = probs.windows(2).map(|w| 100.0 * (w[1] - w[0])).collect();
    let is_positive: Vec<bool> = steps.iter().map(|s| *s > 0.0).collect();

    let mut y_labels = vec!["Base".to_string()];
    y_labels.extend(attr_names.iter().map(|n| (*n).to_string()));

    let bar_text = attr_codes
        .iter()
        .map(|code| {
            let key = format!("{code}#value");
            record
                .get(&key)
                .map(value_text)
                .ok_or(ChartError::MissingField(key))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // disconnected segments drawn as arrows showing how to read the plot
    let mut arrow_x: Vec<Value> = Vec::new();
    let mut arrow_y: Vec<Value> = Vec::new();
    for (i, base) in bases.iter().enumerate() {
        if i > 0 {
            arrow_x.push(Value::Null);
            arrow_y.push(Value::Null);
        }
        arrow_x.extend([json!(base), json!(base)]);
        arrow_y.extend([json!(y_labels[i]), json!(y_labels[i + 1])]);
    }

    let mut bar_base = vec![bases[0]];
    bar_base.extend(&bases);
    let mut bar_x = vec![0.0];
    bar_x.extend(&steps);

    let mut colours = vec!["black"];
    colours.extend(is_positive.iter().map(|p| if *p { "deeppink" } else { "dodgerblue" }));

    let mut text = vec![String::new()];
    text.extend(
        is_positive
            .iter()
            .zip(&bar_text)
            .map(|(p, t)| if *p { format!("{t} >") } else { format!("< {t}") }),
    );

    let mut hover = vec![String::new()];
    hover.extend(
        steps
            .iter()
            .zip(&bases)
            .map(|(s, b)| format!("{s:+.1}% => {:.1}%", b + s)),
    );

    let last = bases.len() - 1;
    let bars = json!({
        "type": "bar",
        "base": bar_base,
        "y": y_labels,
        "x": bar_x,
        "orientation": "h",
        "marker": {"color": colours},
        "text": text,
        "hoverinfo": "text",
        "hovertext": hover,
    });
    let ends = json!({
        "type": "scatter",
        "x": [bases[0], bases[last] + steps[last]],
        "y": [y_labels[0], y_labels[y_labels.len() - 1]],
        "mode": "markers",
        "marker": {"color": "gray", "size": 10},
        "hovertemplate": "%{x:.1f}%",
    });
    let arrows = json!({
        "type": "scatter",
        "x": arrow_x,
        "y": arrow_y,
        "marker": {"color": "black", "symbol": "arrow-up", "angleref": "previous", "size": 12},
        "hoverinfo": "skip",
    });

    Ok(Figure {
        data: vec![bars, ends, arrows],
        layout: json!({
            "title": labels.title,
            "showlegend": false,
            "xaxis": {"title": labels.x_axis, "fixedrange": true},
            "yaxis": {"title": labels.y_axis, "fixedrange": true},
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> Map<String, Value> {
        json!({
            "shap_probs": [0.5, 0.7, 0.6],
            "age#value": 42,
            "sex#value": "F"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn builds_three_traces() {
        let fig = force_plot(&["age", "sex"], &["Age", "Sex"], &record(), &ForcePlotLabels::default())
            .unwrap();
        assert_eq!(fig.data.len(), 3);

        let bars = &fig.data[0];
        assert_eq!(bars["y"], json!(["Base", "Age", "Sex"]));
        assert_eq!(bars["marker"]["color"], json!(["black", "deeppink", "dodgerblue"]));
        assert_eq!(bars["text"], json!(["", "42 >", "< F"]));
        assert_eq!(bars["hovertext"][1], json!("+20.0% => 70.0%"));

        let ends = &fig.data[1];
        assert_eq!(ends["y"], json!(["Base", "Sex"]));
        let final_x = ends["x"][1].as_f64().unwrap();
        assert!((final_x - 60.0).abs() < 1e-9);

        let arrows = &fig.data[2];
        assert_eq!(arrows["y"], json!(["Base", "Age", null, "Age", "Sex"]));
        assert_eq!(fig.layout["title"], json!("Attribute Forces"));
    }

    #[test]
    fn missing_attribute_value_is_error() {
        let mut rec = record();
        rec.remove("sex#value");
        let err = force_plot(&["age", "sex"], &["Age", "Sex"], &rec, &ForcePlotLabels::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::MissingField(k) if k == "sex#value"));
    }

    #[test]
    fn probability_count_must_match() {
        let err = force_plot(&["age"], &["Age"], &record(), &ForcePlotLabels::default()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidField { .. }));
    }
}
