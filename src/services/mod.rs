// 被测服务的接口定义 - 配置器应用对外暴露的六个服务

mod error;
mod model;

pub use error::{ServiceError, ServiceResult};
pub use model::{
    BuildingConfiguration, BuildingGeometry, Dimensions, Material, MaterialSlot, Opening,
    OpeningKind, Point2, Point3, RoofType, SceneObject, Wall,
};

use std::fmt;

pub trait ConfigurationService {
    fn get_configuration(&self) -> ServiceResult<BuildingConfiguration>;
    fn get_dimensions(&self) -> ServiceResult<Dimensions>;
    fn set_dimensions(&self, dimensions: Dimensions) -> ServiceResult<()>;
    /// 导出当前配置（JSON 文本）
    fn export_configuration(&self) -> ServiceResult<String>;
}

pub trait BuildingService {
    /// 尚未生成几何体时返回 `None`
    fn get_building_geometry(&self) -> ServiceResult<Option<BuildingGeometry>>;
    fn get_floor_area(&self) -> ServiceResult<f64>;
    fn get_volume(&self) -> ServiceResult<f64>;
}

pub trait WallService {
    fn get_walls(&self) -> ServiceResult<Vec<Wall>>;
    fn get_wall_count(&self) -> ServiceResult<usize>;
    fn get_total_wall_area(&self) -> ServiceResult<f64>;
}

pub trait OpeningService {
    fn get_openings(&self) -> ServiceResult<Vec<Opening>>;
    fn get_doors(&self) -> ServiceResult<Vec<Opening>>;
    fn get_windows(&self) -> ServiceResult<Vec<Opening>>;
}

pub trait MaterialService {
    fn get_available_materials(&self) -> ServiceResult<Vec<Material>>;
    fn get_selected_material(&self, slot: MaterialSlot) -> ServiceResult<Option<Material>>;
    fn set_material(&self, slot: MaterialSlot, material_id: &str) -> ServiceResult<()>;
}

pub trait SceneService {
    fn get_scene_objects(&self) -> ServiceResult<Vec<SceneObject>>;
    fn get_camera_position(&self) -> ServiceResult<Option<Point3>>;
    /// 导出场景描述（JSON 文本）
    fn export_scene(&self) -> ServiceResult<String>;
}

/// 应用组件 - 持有全部六个服务的引用
///
/// 测试入口通过它取得服务，而不是读取全局状态。
pub trait ConfiguratorApp {
    fn configuration_service(&self) -> &dyn ConfigurationService;
    fn building_service(&self) -> &dyn BuildingService;
    fn wall_service(&self) -> &dyn WallService;
    fn opening_service(&self) -> &dyn OpeningService;
    fn material_service(&self) -> &dyn MaterialService;
    fn scene_service(&self) -> &dyn SceneService;
}

pub const CONFIGURATION_METHODS: &[&str] = &[
    "getConfiguration",
    "getDimensions",
    "setDimensions",
    "exportConfiguration",
];
pub const BUILDING_METHODS: &[&str] = &["getBuildingGeometry", "getFloorArea", "getVolume"];
pub const WALL_METHODS: &[&str] = &["getWalls", "getWallCount", "getTotalWallArea"];
pub const OPENING_METHODS: &[&str] = &["getOpenings", "getDoors", "getWindows"];
pub const MATERIAL_METHODS: &[&str] = &[
    "getAvailableMaterials",
    "getSelectedMaterial",
    "setMaterial",
];
pub const SCENE_METHODS: &[&str] = &["getSceneObjects", "getCameraPosition", "exportScene"];

/// 服务种类，顺序即测试执行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ServiceKind {
    Configuration,
    Building,
    Walls,
    Openings,
    Materials,
    Scene,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::Configuration,
        ServiceKind::Building,
        ServiceKind::Walls,
        ServiceKind::Openings,
        ServiceKind::Materials,
        ServiceKind::Scene,
    ];

    /// 报告中使用的服务名称
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::Configuration => "ConfigurationService",
            ServiceKind::Building => "BuildingService",
            ServiceKind::Walls => "WallService",
            ServiceKind::Openings => "OpeningService",
            ServiceKind::Materials => "MaterialService",
            ServiceKind::Scene => "SceneService",
        }
    }

    /// 按调用顺序排列的被测方法
    pub fn methods(&self) -> &'static [&'static str] {
        match self {
            ServiceKind::Configuration => CONFIGURATION_METHODS,
            ServiceKind::Building => BUILDING_METHODS,
            ServiceKind::Walls => WALL_METHODS,
            ServiceKind::Openings => OPENING_METHODS,
            ServiceKind::Materials => MATERIAL_METHODS,
            ServiceKind::Scene => SCENE_METHODS,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_order_and_names() {
        let names: Vec<&str> = ServiceKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "ConfigurationService",
                "BuildingService",
                "WallService",
                "OpeningService",
                "MaterialService",
                "SceneService",
            ]
        );
    }

    #[test]
    fn test_method_catalog_counts() {
        let total: usize = ServiceKind::ALL.iter().map(|k| k.methods().len()).sum();
        assert_eq!(total, 19);
        assert_eq!(ServiceKind::Configuration.methods().len(), 4);
    }
}
