use crate::runner::types::{TestResult, TestSummary};
use crate::utils::{PayloadFormat, PayloadFormatter};
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use std::fmt::Write;
use std::time::Duration;

/// 同一服务的测试结果
#[derive(Debug)]
pub struct ServiceGroup<'a> {
    pub service: &'a str,
    pub results: Vec<&'a TestResult>,
}

impl ServiceGroup<'_> {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }
}

/// 按服务名分组，分组顺序为服务名首次出现的顺序
pub fn group_by_service(results: &[TestResult]) -> Vec<ServiceGroup<'_>> {
    let mut groups: Vec<ServiceGroup<'_>> = Vec::new();

    for result in results {
        match groups.iter_mut().find(|g| g.service == result.service) {
            Some(group) => group.results.push(result),
            None => groups.push(ServiceGroup {
                service: &result.service,
                results: vec![result],
            }),
        }
    }

    groups
}

pub struct TestReporter {
    verbose: bool,
    color: bool,
    formatter: PayloadFormatter,
}

impl TestReporter {
    pub fn new(verbose: bool, color: bool) -> Self {
        let format = if verbose {
            PayloadFormat::Verbose
        } else {
            PayloadFormat::Compact
        };

        Self {
            verbose,
            color,
            formatter: PayloadFormatter::new(format),
        }
    }

    /// 打印完整报告
    pub fn display(&self, results: &[TestResult]) {
        print!("{}", self.render(results));
    }

    /// 生成完整报告文本
    pub fn render(&self, results: &[TestResult]) -> String {
        let summary = TestSummary::from_results(results);
        let groups = group_by_service(results);
        let mut out = String::new();

        let _ = writeln!(
            out,
            "\n{} ({})\n",
            self.paint("Service test results", |s| s.bold()),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        for group in &groups {
            self.render_group(&mut out, group);
        }

        self.render_summary(&mut out, &summary, &groups);
        out
    }

    fn render_group(&self, out: &mut String, group: &ServiceGroup<'_>) {
        let _ = writeln!(
            out,
            "{} ({}/{} passed)",
            self.paint(group.service, |s| s.bold()),
            group.passed(),
            group.results.len()
        );

        for result in &group.results {
            self.render_result(out, result);
        }
        out.push('\n');
    }

    fn render_result(&self, out: &mut String, result: &TestResult) {
        let symbol = if result.success {
            self.paint("✓", |s| s.green())
        } else {
            self.paint("✗", |s| s.red())
        };

        let _ = writeln!(
            out,
            " {} {} - {} ({}ms)",
            symbol,
            self.paint(&result.method, |s| s.cyan()),
            result.message,
            result.duration.as_millis()
        );

        let Some(payload) = &result.data else {
            return;
        };

        if let Some(error) = payload.as_error() {
            let _ = writeln!(
                out,
                "   {}: {}",
                self.paint("Error", |s| s.red().bold()),
                error
            );
        } else if self.verbose || !result.success {
            let label = self.paint("Returned", |s| s.dimmed());
            let formatted = self.formatter.format(payload);
            let mut lines = formatted.lines();
            if let Some(first) = lines.next() {
                let _ = writeln!(out, "   {}: {}", label, first);
            }
            for line in lines {
                let _ = writeln!(out, "     {}", line);
            }
        }
    }

    fn render_summary(&self, out: &mut String, summary: &TestSummary, groups: &[ServiceGroup<'_>]) {
        let _ = writeln!(out, "{}", "━".repeat(50));
        let _ = writeln!(out, "{}", self.paint("Summary", |s| s.bold()));
        let _ = writeln!(out, "{}", "━".repeat(50));

        let passed = self.paint(&summary.passed.to_string(), |s| s.green());
        if summary.failed == 0 {
            let _ = writeln!(
                out,
                "  {}: {} passed, {} total",
                self.paint("Tests", |s| s.bold()),
                passed,
                summary.total
            );
        } else {
            let _ = writeln!(
                out,
                "  {}: {} passed, {} failed, {} total",
                self.paint("Tests", |s| s.bold()),
                passed,
                self.paint(&summary.failed.to_string(), |s| s.red()),
                summary.total
            );
        }
        let _ = writeln!(
            out,
            "  {}: {:.3}s",
            self.paint("Duration", |s| s.bold()),
            summary.total_duration.as_secs_f64()
        );

        if !groups.is_empty() {
            let _ = writeln!(out, "{}", self.service_table(groups));
        }
    }

    fn service_table(&self, groups: &[ServiceGroup<'_>]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Service", "Passed", "Failed", "Total", "Duration"]);

        for group in groups {
            let failed = group.failed();
            let mut failed_cell = Cell::new(failed);
            if self.color {
                failed_cell = failed_cell.fg(if failed == 0 { Color::Green } else { Color::Red });
            }

            table.add_row(vec![
                Cell::new(group.service),
                Cell::new(group.passed()),
                failed_cell,
                Cell::new(group.results.len()),
                Cell::new(format!("{}ms", group.duration().as_millis())),
            ]);
        }

        table
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::types::GENERAL_METHOD;
    use serde_json::json;

    fn sample_results() -> Vec<TestResult> {
        vec![
            TestResult::passed(
                "WallService",
                "getWalls",
                "walls: 4",
                Some(json!([{"id": "w1"}])),
                Duration::from_millis(3),
            ),
            TestResult::passed(
                "SceneService",
                "getSceneObjects",
                "scene objects: 9",
                None,
                Duration::from_millis(1),
            ),
            TestResult::error(
                "WallService",
                GENERAL_METHOD,
                "Error while testing WallService",
                "service unavailable: walls",
                Duration::from_millis(2),
            ),
        ]
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let results = sample_results();
        let groups = group_by_service(&results);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].service, "WallService");
        assert_eq!(groups[1].service, "SceneService");
        assert_eq!(groups[0].results.len(), 2);
        assert_eq!(groups[0].passed(), 1);
        assert_eq!(groups[0].failed(), 1);
        assert_eq!(groups[0].duration(), Duration::from_millis(5));
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_service(&[]).is_empty());
    }

    #[test]
    fn test_render_includes_error_payload() {
        let reporter = TestReporter::new(false, false);
        let text = reporter.render(&sample_results());

        assert!(text.contains("WallService (1/2 passed)"));
        assert!(text.contains(" ✗ general - Error while testing WallService"));
        assert!(text.contains("   Error: service unavailable: walls"));
        assert!(text.contains("Tests: 2 passed, 1 failed, 3 total"));
    }

    #[test]
    fn test_render_groups_in_order() {
        let reporter = TestReporter::new(false, false);
        let text = reporter.render(&sample_results());

        let walls = text.find("WallService (").unwrap();
        let scene = text.find("SceneService (").unwrap();
        assert!(walls < scene);
    }

    #[test]
    fn test_success_payload_only_in_verbose() {
        let results = sample_results();

        let compact = TestReporter::new(false, false).render(&results);
        assert!(!compact.contains("Returned"));

        let verbose = TestReporter::new(true, false).render(&results);
        assert!(verbose.contains("Returned"));
        assert!(verbose.contains("\"id\": \"w1\""));
    }

    #[test]
    fn test_all_passed_summary_line() {
        let results = vec![TestResult::passed(
            "BuildingService",
            "getVolume",
            "Volume: 10.00",
            Some(json!(10.0)),
            Duration::ZERO,
        )];
        let text = TestReporter::new(false, false).render(&results);
        assert!(text.contains("Tests: 1 passed, 1 total"));
        assert!(!text.contains("failed,"));
    }
}
