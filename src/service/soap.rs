//! Envelope construction and result extraction for the admin web service.
//! Requests and responses are SOAP documents whose payload is a single
//! `<return>` field.

use crate::dates::TimeRange;
use crate::error::{AppError, AppResult};

pub fn run_report_envelope(folder: &str, report_name: &str, range: &TimeRange) -> String {
    format!(
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         xmlns:ser=\"http://service.admin.ws.five9.com/\">\
         <soapenv:Header/>\
         <soapenv:Body>\
         <ser:runReport>\
         <folderName>{}</folderName>\
         <reportName>{}</reportName>\
         <criteria><time><start>{}</start><end>{}</end></time></criteria>\
         </ser:runReport>\
         </soapenv:Body>\
         </soapenv:Envelope>",
        xml_escape(folder),
        xml_escape(report_name),
        xml_escape(&range.start),
        xml_escape(&range.end),
    )
}

pub fn is_running_envelope(identifier: &str) -> String {
    single_field_envelope("isReportRunning", identifier)
}

pub fn result_csv_envelope(identifier: &str) -> String {
    single_field_envelope("getReportResultCsv", identifier)
}

fn single_field_envelope(operation: &str, identifier: &str) -> String {
    format!(
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         xmlns:ser=\"http://service.admin.ws.five9.com/\">\
         <soapenv:Header/>\
         <soapenv:Body>\
         <ser:{operation}>\
         <identifier>{}</identifier>\
         </ser:{operation}>\
         </soapenv:Body>\
         </soapenv:Envelope>",
        xml_escape(identifier),
    )
}

/// Pull the text of the single `<return>` field out of a response body.
pub fn extract_result(body: &str) -> AppResult<String> {
    if let Some(start) = body.find("<return>") {
        let rest = &body[start + "<return>".len()..];
        let end = rest
            .find("</return>")
            .ok_or_else(|| AppError::Protocol("unterminated result field".to_string()))?;
        return Ok(xml_unescape(&rest[..end]));
    }
    if body.contains("<return/>") {
        return Ok(String::new());
    }
    Err(AppError::Protocol(
        "response is missing the result field".to_string(),
    ))
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn xml_unescape(value: &str) -> String {
    // &amp; last so escaped ampersands do not re-expand.
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#13;", "\r")
        .replace("&#10;", "\n")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> TimeRange {
        TimeRange {
            start: "2025-03-07T00:00:00.000-05:00".to_string(),
            end: "2025-03-14T23:59:59.000-05:00".to_string(),
        }
    }

    #[test]
    fn test_run_report_envelope_carries_all_fields() {
        let envelope = run_report_envelope("Shared Reports", "Call Log", &range());
        assert!(envelope.contains("<folderName>Shared Reports</folderName>"));
        assert!(envelope.contains("<reportName>Call Log</reportName>"));
        assert!(envelope.contains("<start>2025-03-07T00:00:00.000-05:00</start>"));
        assert!(envelope.contains("<end>2025-03-14T23:59:59.000-05:00</end>"));
    }

    #[test]
    fn test_run_report_envelope_escapes_markup() {
        let envelope = run_report_envelope("Shared Reports", "P&L <summary>", &range());
        assert!(envelope.contains("<reportName>P&amp;L &lt;summary&gt;</reportName>"));
        assert!(!envelope.contains("P&L"));
    }

    #[test]
    fn test_status_envelopes_name_their_operation() {
        assert!(is_running_envelope("abc").contains("<ser:isReportRunning>"));
        assert!(is_running_envelope("abc").contains("<identifier>abc</identifier>"));
        assert!(result_csv_envelope("abc").contains("<ser:getReportResultCsv>"));
    }

    #[test]
    fn test_extract_result_returns_field_text() {
        let body = "<Envelope><Body><runReportResponse><return>job-42</return>\
                    </runReportResponse></Body></Envelope>";
        assert_eq!(extract_result(body).unwrap(), "job-42");
    }

    #[test]
    fn test_extract_result_unescapes_entities() {
        let body = "<return>a,b&#10;1,&amp;2&#10;</return>";
        assert_eq!(extract_result(body).unwrap(), "a,b\n1,&2\n");
    }

    #[test]
    fn test_extract_result_empty_self_closing() {
        assert_eq!(extract_result("<Body><return/></Body>").unwrap(), "");
    }

    #[test]
    fn test_extract_result_missing_field_is_protocol_error() {
        let err = extract_result("<Envelope><Body/></Envelope>").unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
    }

    #[test]
    fn test_extract_result_unterminated_field_is_protocol_error() {
        let err = extract_result("<return>truncated").unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
    }
}
