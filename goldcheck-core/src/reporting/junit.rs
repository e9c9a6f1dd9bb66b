//! JUnit XML output.
//!
//! One `<testsuite>` per run. Passing cases are bare `<testcase>` elements,
//! failing cases carry a `<failure>` and skipped ones a `<skipped/>`.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::SuiteReport;
use crate::error::{CoreError, CoreResult};
use crate::validation::{CheckStatus, ComparisonResult};

fn xml_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::Report(format!("write error: {e}"))
}

/// Writes `report` to `path`, creating parent directories as needed.
pub fn write_junit(report: &SuiteReport, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_junit_to(&mut writer, report)?;
    writer.flush()?;
    log::info!("Report written to {}", path.display());
    Ok(())
}

/// Renders `report` as a JUnit XML string.
pub fn render_junit(report: &SuiteReport) -> CoreResult<String> {
    let mut buffer = Vec::new();
    write_junit_to(&mut buffer, report)?;
    String::from_utf8(buffer).map_err(xml_error)
}

/// Writes JUnit XML to any writer.
pub fn write_junit_to<W: Write>(writer: W, report: &SuiteReport) -> CoreResult<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let tests = report.tests().to_string();
    let failures = report.failures().to_string();
    let skipped = report.skipped().to_string();
    let timestamp = report.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut suite = BytesStart::new("testsuite");
    suite.push_attribute(("name", report.name.as_str()));
    suite.push_attribute(("tests", tests.as_str()));
    suite.push_attribute(("failures", failures.as_str()));
    suite.push_attribute(("errors", "0"));
    suite.push_attribute(("skipped", skipped.as_str()));
    suite.push_attribute(("timestamp", timestamp.as_str()));
    xml.write_event(Event::Start(suite)).map_err(xml_error)?;

    for case in &report.cases {
        write_case(&mut xml, &report.name, case)?;
    }

    xml.write_event(Event::End(BytesEnd::new("testsuite")))
        .map_err(xml_error)?;
    Ok(())
}

fn write_case<W: Write>(
    xml: &mut Writer<W>,
    classname: &str,
    case: &ComparisonResult,
) -> CoreResult<()> {
    let mut start = BytesStart::new("testcase");
    start.push_attribute(("classname", classname));
    start.push_attribute(("name", case.name.as_str()));

    if case.status == CheckStatus::Passed && case.measurement.is_none() {
        return xml.write_event(Event::Empty(start)).map_err(xml_error);
    }

    xml.write_event(Event::Start(start)).map_err(xml_error)?;

    if let Some(value) = case.measurement {
        let value = value.to_string();
        xml.write_event(Event::Start(BytesStart::new("properties")))
            .map_err(xml_error)?;
        let mut property = BytesStart::new("property");
        property.push_attribute(("name", "measurement"));
        property.push_attribute(("value", value.as_str()));
        xml.write_event(Event::Empty(property)).map_err(xml_error)?;
        xml.write_event(Event::End(BytesEnd::new("properties")))
            .map_err(xml_error)?;
    }

    match case.status {
        CheckStatus::Passed => {}
        CheckStatus::Failed => {
            let message = case.message.as_deref().unwrap_or("check failed");
            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("message", message));
            xml.write_event(Event::Start(failure)).map_err(xml_error)?;
            xml.write_event(Event::Text(BytesText::new(message)))
                .map_err(xml_error)?;
            xml.write_event(Event::End(BytesEnd::new("failure")))
                .map_err(xml_error)?;
        }
        CheckStatus::Skipped => {
            let mut skipped = BytesStart::new("skipped");
            if let Some(reason) = case.message.as_deref() {
                skipped.push_attribute(("message", reason));
            }
            xml.write_event(Event::Empty(skipped)).map_err(xml_error)?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("testcase")))
        .map_err(xml_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SuiteReport {
        SuiteReport::new(
            "golden.snake.linux",
            vec![
                ComparisonResult::passed("container_pix_fmt"),
                ComparisonResult::passed("frame_5s").with_measurement(0.9991),
                ComparisonResult::failed("audio_lufs", "loudness -10.0 vs -13.0 <tol 1.0>"),
                ComparisonResult::skipped("audio_peak", "no audio"),
            ],
        )
    }

    #[test]
    fn test_suite_attributes() {
        let xml = render_junit(&sample()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("name=\"golden.snake.linux\""));
        assert!(xml.contains("tests=\"4\""));
        assert!(xml.contains("failures=\"1\""));
        assert!(xml.contains("errors=\"0\""));
        assert!(xml.contains("skipped=\"1\""));
    }

    #[test]
    fn test_case_shapes() {
        let xml = render_junit(&sample()).unwrap();
        assert!(xml.contains(
            "<testcase classname=\"golden.snake.linux\" name=\"container_pix_fmt\"/>"
        ));
        assert!(xml.contains("<property name=\"measurement\" value=\"0.9991\"/>"));
        assert!(xml.contains("<skipped message=\"no audio\"/>"));
        // message text is escaped
        assert!(xml.contains("&lt;tol 1.0&gt;"));
        assert!(xml.contains("<failure message="));
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.xml");
        write_junit(&sample(), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("</testsuite>"));
    }
}
