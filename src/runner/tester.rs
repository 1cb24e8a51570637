use crate::config::HarnessConfig;
use crate::runner::check::{self, Verdict};
use crate::runner::probe::ServiceProbe;
use crate::runner::reporter::TestReporter;
use crate::runner::types::{TestResult, TestSummary};
use crate::services::{
    BuildingService, ConfigurationService, ConfiguratorApp, MaterialService, MaterialSlot,
    OpeningKind, OpeningService, SceneService, ServiceKind, WallService,
};
use tracing::{error, info};

/// 一次测试运行用到的六个服务
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub configuration: &'a dyn ConfigurationService,
    pub building: &'a dyn BuildingService,
    pub walls: &'a dyn WallService,
    pub openings: &'a dyn OpeningService,
    pub materials: &'a dyn MaterialService,
    pub scene: &'a dyn SceneService,
}

impl<'a> Services<'a> {
    pub fn from_app(app: &'a dyn ConfiguratorApp) -> Self {
        Self {
            configuration: app.configuration_service(),
            building: app.building_service(),
            walls: app.wall_service(),
            openings: app.opening_service(),
            materials: app.material_service(),
            scene: app.scene_service(),
        }
    }
}

/// 服务冒烟测试器
///
/// 依次调用每个服务的固定方法列表，收集结果并输出分组报告。
pub struct ServiceTester {
    config: HarnessConfig,
    reporter: TestReporter,
    results: Vec<TestResult>,
}

impl ServiceTester {
    pub fn new(config: HarnessConfig) -> Self {
        let reporter = TestReporter::new(config.verbose, config.color);
        Self {
            config,
            reporter,
            results: Vec::new(),
        }
    }

    /// 最近一次运行累积的结果
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn summary(&self) -> TestSummary {
        TestSummary::from_results(&self.results)
    }

    /// 清空上次结果，按固定顺序测试全部服务，然后输出报告
    pub fn run_all_tests(&mut self, services: &Services<'_>) -> TestSummary {
        self.results.clear();
        info!(scope = ?self.config.failure_scope, "Running service tests");

        let batches = [
            self.test_configuration_service(services.configuration),
            self.test_building_service(services.building),
            self.test_wall_service(services.walls),
            self.test_opening_service(services.openings),
            self.test_material_service(services.materials),
            self.test_scene_service(services.scene),
        ];
        self.results.extend(batches.into_iter().flatten());

        self.display_results();

        let summary = self.summary();
        info!(
            passed = summary.passed,
            failed = summary.failed,
            total = summary.total,
            "Service tests finished"
        );
        summary
    }

    pub fn display_results(&self) {
        self.reporter.display(&self.results);
    }

    pub fn test_configuration_service(
        &self,
        service: &dyn ConfigurationService,
    ) -> Vec<TestResult> {
        self.probe(ServiceKind::Configuration).run(|p| {
            p.call(
                "getConfiguration",
                || service.get_configuration(),
                |config| {
                    if config.name.trim().is_empty() {
                        Verdict::fail("Configuration has no name")
                    } else {
                        Verdict::pass(format!("Configuration '{}' loaded", config.name))
                    }
                },
            )?;

            let dimensions = p.call(
                "getDimensions",
                || service.get_dimensions(),
                |d| {
                    if d.is_valid() {
                        Verdict::pass(format!("Dimensions: {}", d))
                    } else {
                        Verdict::fail(format!("Invalid dimensions: {}", d))
                    }
                },
            )?;

            // 写回当前尺寸，不改变配置；未通过检查的尺寸不写回
            match dimensions {
                Some(d) if !d.is_valid() => {
                    p.skip("setDimensions", "getDimensions returned invalid dimensions")
                }
                Some(d) => {
                    p.call(
                        "setDimensions",
                        || service.set_dimensions(d),
                        |_| check::completed("Dimensions"),
                    )?;
                }
                None => p.skip("setDimensions", "getDimensions returned no value"),
            }

            p.call(
                "exportConfiguration",
                || service.export_configuration(),
                |json| check::non_empty_text(json, "Configuration export"),
            )?;
            Ok(())
        })
    }

    pub fn test_building_service(&self, service: &dyn BuildingService) -> Vec<TestResult> {
        self.probe(ServiceKind::Building).run(|p| {
            p.call(
                "getBuildingGeometry",
                || service.get_building_geometry(),
                |geometry| check::present(geometry, "Building geometry"),
            )?;
            p.call(
                "getFloorArea",
                || service.get_floor_area(),
                |area| check::non_negative(*area, "Floor area"),
            )?;
            p.call(
                "getVolume",
                || service.get_volume(),
                |volume| check::non_negative(*volume, "Volume"),
            )?;
            Ok(())
        })
    }

    pub fn test_wall_service(&self, service: &dyn WallService) -> Vec<TestResult> {
        self.probe(ServiceKind::Walls).run(|p| {
            p.call(
                "getWalls",
                || service.get_walls(),
                |walls| check::non_empty(walls, "walls"),
            )?;
            p.call(
                "getWallCount",
                || service.get_wall_count(),
                |count| Verdict::pass(format!("Wall count: {}", count)),
            )?;
            p.call(
                "getTotalWallArea",
                || service.get_total_wall_area(),
                |area| check::non_negative(*area, "Total wall area"),
            )?;
            Ok(())
        })
    }

    pub fn test_opening_service(&self, service: &dyn OpeningService) -> Vec<TestResult> {
        self.probe(ServiceKind::Openings).run(|p| {
            p.call(
                "getOpenings",
                || service.get_openings(),
                |openings| check::listed(openings, "openings"),
            )?;
            p.call(
                "getDoors",
                || service.get_doors(),
                |doors| {
                    if doors.iter().all(|o| o.kind == OpeningKind::Door) {
                        check::listed(doors, "doors")
                    } else {
                        Verdict::fail("Door list contains other openings")
                    }
                },
            )?;
            p.call(
                "getWindows",
                || service.get_windows(),
                |windows| {
                    if windows.iter().all(|o| o.kind == OpeningKind::Window) {
                        check::listed(windows, "windows")
                    } else {
                        Verdict::fail("Window list contains other openings")
                    }
                },
            )?;
            Ok(())
        })
    }

    pub fn test_material_service(&self, service: &dyn MaterialService) -> Vec<TestResult> {
        self.probe(ServiceKind::Materials).run(|p| {
            let available = p.call(
                "getAvailableMaterials",
                || service.get_available_materials(),
                |materials| check::non_empty(materials, "materials"),
            )?;
            let selected = p.call(
                "getSelectedMaterial",
                || service.get_selected_material(MaterialSlot::Walls),
                |material| check::present(material, "Wall material"),
            )?;

            // 重新应用当前材质；未选择时退回到第一个可用材质
            let material_id = selected
                .flatten()
                .or_else(|| available.and_then(|m| m.into_iter().next()))
                .map(|m| m.id);
            match material_id {
                Some(id) => {
                    p.call(
                        "setMaterial",
                        || service.set_material(MaterialSlot::Walls, &id),
                        |_| check::completed("Wall material"),
                    )?;
                }
                None => p.skip("setMaterial", "no material to apply"),
            }
            Ok(())
        })
    }

    pub fn test_scene_service(&self, service: &dyn SceneService) -> Vec<TestResult> {
        self.probe(ServiceKind::Scene).run(|p| {
            p.call(
                "getSceneObjects",
                || service.get_scene_objects(),
                |objects| check::non_empty(objects, "scene objects"),
            )?;
            p.call(
                "getCameraPosition",
                || service.get_camera_position(),
                |position| match position {
                    Some(pos) if !pos.is_finite() => {
                        Verdict::fail("Camera position has non-finite coordinates")
                    }
                    _ => check::present(position, "Camera position"),
                },
            )?;
            p.call(
                "exportScene",
                || service.export_scene(),
                |json| check::non_empty_text(json, "Scene export"),
            )?;
            Ok(())
        })
    }

    fn probe(&self, kind: ServiceKind) -> ServiceProbe {
        ServiceProbe::new(kind.name(), self.config.failure_scope)
    }
}

impl Default for ServiceTester {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

/// 测试入口：从应用组件取出六个服务并运行全部测试
///
/// 应用组件不存在时只记录错误并返回 `None`，不会调用任何服务。
pub fn test_all_services(
    app: Option<&dyn ConfiguratorApp>,
    config: HarnessConfig,
) -> Option<TestSummary> {
    let Some(app) = app else {
        error!("Configurator application not available; no services to test");
        return None;
    };

    let services = Services::from_app(app);
    let mut tester = ServiceTester::new(config);
    Some(tester.run_all_tests(&services))
}
