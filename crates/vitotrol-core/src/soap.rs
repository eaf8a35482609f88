//! SOAP envelope construction and response parsing.
//!
//! Every Vitotrol call is a SOAP 1.1 `POST` whose body holds one element named
//! after the action. The answer wraps a `<{Action}Result>` element carrying an
//! error number (`Ergebnis`), an error text (`ErgebnisText`) and the
//! action-specific fields.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Namespace of the Vitotrol web service, also the `SOAPAction` prefix.
pub const SOAP_NAMESPACE: &str = "http://www.e-controlnet.de/services/vii/";

/// Content type sent with every request.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

const ENVELOPE_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/""#,
    r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
    r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema">"#,
    "<soap:Body>"
);

const ENVELOPE_FOOTER: &str = "</soap:Body></soap:Envelope>";

/// SOAP actions used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoapAction {
    /// Authenticate and obtain a session cookie.
    Login,
    /// Write a value to a data point.
    WriteData,
    /// Ask whether a previous `WriteData` has been applied.
    RequestWriteStatus,
    /// Ask the server to re-read data points from the device.
    RefreshData,
    /// Ask whether a previous `RefreshData` has completed.
    RequestRefreshStatus,
}

impl SoapAction {
    /// The action name as used in the envelope and `SOAPAction` header.
    pub fn name(self) -> &'static str {
        match self {
            SoapAction::Login => "Login",
            SoapAction::WriteData => "WriteData",
            SoapAction::RequestWriteStatus => "RequestWriteStatus",
            SoapAction::RefreshData => "RefreshData",
            SoapAction::RequestRefreshStatus => "RequestRefreshStatus",
        }
    }

    /// Value of the `SOAPAction` HTTP header.
    pub fn soap_action_url(self) -> String {
        format!("{}{}", SOAP_NAMESPACE, self.name())
    }

    fn result_element(self) -> String {
        format!("{}Result", self.name())
    }
}

/// Body of a SOAP request, built field by field in wire order.
#[derive(Debug, Clone)]
pub struct SoapRequest {
    action: SoapAction,
    body: String,
}

impl SoapRequest {
    /// Start a request for the given action.
    pub fn new(action: SoapAction) -> Self {
        Self {
            action,
            body: String::new(),
        }
    }

    /// The action this request calls.
    pub fn action(&self) -> SoapAction {
        self.action
    }

    /// Append a text element. The value is XML-escaped.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        let value = value.to_string();
        self.body.push_str(&format!("<{name}>{}</{name}>", escape(value.as_str())));
        self
    }

    /// Append a list of integers as `<name><int>…</int>…</name>`.
    #[must_use]
    pub fn int_list<I, T>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.body.push_str(&format!("<{name}>"));
        for value in values {
            self.body.push_str(&format!("<int>{}</int>", value));
        }
        self.body.push_str(&format!("</{name}>"));
        self
    }

    /// Render the full SOAP envelope.
    pub fn envelope(&self) -> String {
        let action = self.action.name();
        format!(
            r#"{ENVELOPE_HEADER}<{action} xmlns="{SOAP_NAMESPACE}">{}</{action}>{ENVELOPE_FOOTER}"#,
            self.body
        )
    }
}

/// The leaf fields of a `<{Action}Result>` element.
#[derive(Debug, Clone, Default)]
pub struct ResultFields {
    action: &'static str,
    fields: HashMap<String, String>,
}

impl ResultFields {
    /// Text of a field, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text of a required field.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.text(name).ok_or_else(|| {
            Error::invalid_response(self.action, format!("missing {} element", name))
        })
    }

    /// Parse a required field.
    pub fn parse<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require(name)?;
        raw.trim().parse().map_err(|e: T::Err| {
            Error::invalid_response(self.action, format!("invalid {} '{}': {}", name, raw, e))
        })
    }
}

/// Parse a SOAP response body for `action`.
///
/// Fails with [`Error::Fault`] on a SOAP fault, [`Error::Remote`] when the
/// result carries a non-zero `Ergebnis`, and [`Error::InvalidResponse`] when
/// the XML is malformed or the result element is missing.
pub fn parse_result(action: SoapAction, xml: &str) -> Result<ResultFields> {
    let name = action.name();
    let result_element = action.result_element();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut result_depth: Option<usize> = None;
    let mut found_result = false;
    let mut in_fault = false;
    let mut fault_string: Option<String> = None;
    // Field whose text is being read, with the depth it was opened at
    let mut current: Option<(String, usize)> = None;
    let mut fields = HashMap::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::invalid_response(name, e.to_string()))?;

        let text = match event {
            Event::Start(e) => {
                depth += 1;
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if local == "Fault" {
                    in_fault = true;
                } else if result_depth.is_none() && !found_result && local == result_element {
                    result_depth = Some(depth);
                    found_result = true;
                } else if current.is_none()
                    && (in_fault || result_depth.is_some_and(|d| depth == d + 1))
                {
                    current = Some((local, depth));
                }
                continue;
            }
            Event::Empty(e) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if local == result_element && result_depth.is_none() {
                    found_result = true;
                } else if current.is_none() && result_depth.is_some_and(|d| depth == d) {
                    fields.insert(local, String::new());
                }
                continue;
            }
            Event::End(_) => {
                if result_depth == Some(depth) {
                    result_depth = None;
                }
                if current.as_ref().is_some_and(|(_, d)| *d == depth) {
                    current = None;
                }
                depth = depth.saturating_sub(1);
                continue;
            }
            Event::Text(t) if current.is_some() => t
                .unescape()
                .map_err(|e| Error::invalid_response(name, e.to_string()))?
                .into_owned(),
            Event::CData(c) if current.is_some() => {
                String::from_utf8_lossy(&c.into_inner()).into_owned()
            }
            Event::Eof => break,
            _ => continue,
        };

        // Text of nested elements is not a field value
        let Some((field, _)) = current.as_ref().filter(|(_, d)| *d == depth) else {
            continue;
        };
        if in_fault {
            if field == "faultstring" {
                fault_string = Some(text);
            }
        } else {
            fields.insert(field.clone(), text);
        }
    }

    if in_fault {
        return Err(Error::Fault {
            action: name,
            message: fault_string.unwrap_or_else(|| "unknown SOAP fault".to_string()),
        });
    }

    if !found_result {
        return Err(Error::invalid_response(
            name,
            format!("missing {} element", result_element),
        ));
    }

    let result = ResultFields {
        action: name,
        fields,
    };

    // An absent error number means success, as the service omits it for some actions
    let code = match result.text("Ergebnis") {
        Some(_) => result.parse::<i32>("Ergebnis")?,
        None => 0,
    };
    if code != 0 {
        return Err(Error::Remote {
            action: name,
            code,
            message: result.text("ErgebnisText").unwrap_or_default().to_string(),
        });
    }

    Ok(result)
}
