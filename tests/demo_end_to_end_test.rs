use configurator_smoke::config::{FailureScope, HarnessConfig};
use configurator_smoke::demo::DemoConfigurator;
use configurator_smoke::runner::{GENERAL_METHOD, Services, TestReporter};
use configurator_smoke::services::{ConfiguratorApp, ServiceKind};
use configurator_smoke::{ServiceTester, test_all_services};

fn quiet_config() -> HarnessConfig {
    HarnessConfig {
        color: false,
        ..HarnessConfig::default()
    }
}

/// 演示应用的全部服务都应通过
#[test]
fn test_demo_app_passes_all_checks() {
    let app = DemoConfigurator::new();
    let summary = test_all_services(Some(&app as &dyn ConfiguratorApp), quiet_config()).unwrap();

    assert_eq!(summary.total, 19);
    assert_eq!(summary.failed, 0);
}

/// 关闭一个服务只产生一条通用失败记录
#[test]
fn test_demo_app_with_offline_service() {
    let app = DemoConfigurator::new().with_fault(ServiceKind::Materials);
    let mut tester = ServiceTester::new(quiet_config());
    let summary = tester.run_all_tests(&Services::from_app(&app));

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total, 17);

    let failed = tester.results().iter().find(|r| !r.success).unwrap();
    assert_eq!(failed.service, "MaterialService");
    assert_eq!(failed.method, GENERAL_METHOD);
    assert_eq!(
        failed.error_payload(),
        Some("service unavailable: MaterialService is offline")
    );
}

#[test]
fn test_demo_app_per_method_scope() {
    let app = DemoConfigurator::new().with_fault(ServiceKind::Scene);
    let config = HarnessConfig {
        failure_scope: FailureScope::Method,
        ..quiet_config()
    };
    let mut tester = ServiceTester::new(config);
    let summary = tester.run_all_tests(&Services::from_app(&app));

    // 三个场景方法各自失败
    assert_eq!(summary.total, 19);
    assert_eq!(summary.failed, 3);
}

#[test]
fn test_report_for_demo_run() {
    let app = DemoConfigurator::new().with_fault(ServiceKind::Walls);
    let mut tester = ServiceTester::new(quiet_config());
    tester.run_all_tests(&Services::from_app(&app));

    let text = TestReporter::new(false, false).render(tester.results());
    assert!(text.contains("ConfigurationService (4/4 passed)"));
    assert!(text.contains("WallService (0/1 passed)"));
    assert!(text.contains("Error: service unavailable: WallService is offline"));
    assert!(text.contains("Tests: 16 passed, 1 failed, 17 total"));

    let config_pos = text.find("ConfigurationService (").unwrap();
    let scene_pos = text.find("SceneService (").unwrap();
    assert!(config_pos < scene_pos);
}
