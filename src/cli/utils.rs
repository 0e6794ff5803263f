use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Error whose message already reached the user through `output_error`
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

/// Print the error in the requested format and hand back an error the
/// binary exits on without printing again
pub fn fail(output_format: &OutputFormat, message: &str, error_code: &str) -> anyhow::Error {
    match output_error(output_format, message, Some(error_code)) {
        Ok(()) => Reported(message.to_string()).into(),
        Err(e) => e,
    }
}

/// Output a list of rows: a JSON array under `collection_name`, or one line per row
pub fn output_rows(
    output_format: &OutputFormat,
    collection_name: &str,
    rows: Vec<Value>,
    line: impl Fn(&Value) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ collection_name: rows }))?
            );
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No {} found", collection_name);
            }
            for row in &rows {
                println!("{}", line(row));
            }
        }
    }
    Ok(())
}

/// Render an optional target the way text output shows it
pub fn target_label(value: &Value) -> &str {
    value.as_str().unwrap_or("(undecided)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_marked_as_reported() {
        let err = fail(&OutputFormat::Json, "Invalid login", "LOGIN_DENIED");
        let reported = err.downcast_ref::<Reported>().expect("reported error");
        assert_eq!(reported.0, "Invalid login");
    }

    #[test]
    fn plain_errors_are_not_reported() {
        let err = anyhow::anyhow!("config missing");
        assert!(err.downcast_ref::<Reported>().is_none());
    }
}
