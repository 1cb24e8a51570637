use crate::services::{
    BuildingConfiguration, BuildingGeometry, BuildingService, ConfigurationService,
    ConfiguratorApp, Dimensions, Material, MaterialService, MaterialSlot, Opening, OpeningKind,
    OpeningService, Point2, Point3, RoofType, SceneObject, SceneService, ServiceError,
    ServiceKind, ServiceResult, Wall, WallService,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

const WALL_THICKNESS: f64 = 0.2;
const DOOR_SIZE: (f64, f64) = (0.9, 2.1);
const WINDOW_SIZE: (f64, f64) = (1.2, 1.2);
const WINDOW_SILL: f64 = 0.9;

struct DemoState {
    configuration: BuildingConfiguration,
    selected: HashMap<MaterialSlot, String>,
}

/// 命令行使用的内存配置器
///
/// 六个服务共用同一个建筑模型：矩形平面、四面外墙、一扇门两扇窗、
/// 一组材质以及由此生成的场景。可以让指定服务整体失败，用来查看失败报告。
pub struct DemoConfigurator {
    state: RefCell<DemoState>,
    palette: Vec<Material>,
    faults: HashSet<ServiceKind>,
}

impl DemoConfigurator {
    pub fn new() -> Self {
        let palette = vec![
            material("plaster", "White plaster", "#f2efe9", 0.9),
            material("brick", "Red brick", "#9c4a32", 0.8),
            material("timber", "Larch timber", "#c8a374", 0.7),
            material("glass", "Clear glass", "#d6eef5", 0.05),
        ];

        let selected = HashMap::from([
            (MaterialSlot::Walls, "plaster".to_string()),
            (MaterialSlot::Roof, "timber".to_string()),
            (MaterialSlot::Floor, "timber".to_string()),
            (MaterialSlot::Openings, "glass".to_string()),
        ]);

        Self {
            state: RefCell::new(DemoState {
                configuration: BuildingConfiguration {
                    name: "Garden cabin".to_string(),
                    dimensions: Dimensions::new(6.0, 4.0, 2.7),
                    roof: RoofType::Gable,
                    floors: 1,
                },
                selected,
            }),
            palette,
            faults: HashSet::new(),
        }
    }

    /// 让 `kind` 服务的所有方法返回 `ServiceError::Unavailable`
    pub fn with_fault(mut self, kind: ServiceKind) -> Self {
        self.faults.insert(kind);
        self
    }

    fn guard(&self, kind: ServiceKind) -> ServiceResult<()> {
        if self.faults.contains(&kind) {
            return Err(ServiceError::Unavailable(format!("{} is offline", kind.name())));
        }
        Ok(())
    }

    fn configuration(&self) -> BuildingConfiguration {
        self.state.borrow().configuration.clone()
    }

    fn walls(&self) -> Vec<Wall> {
        let config = self.configuration();
        let Dimensions { width, length, .. } = config.dimensions;
        let corners = footprint(&config.dimensions);
        let height = storey_height(&config);

        (0..corners.len())
            .map(|i| Wall {
                id: format!("wall-{}", i + 1),
                start: corners[i],
                end: corners[(i + 1) % corners.len()],
                height,
                thickness: WALL_THICKNESS,
            })
            .filter(|w| width > 0.0 && length > 0.0 && w.length() > 0.0)
            .collect()
    }

    fn openings(&self) -> Vec<Opening> {
        let walls = self.walls();
        let mut openings = Vec::new();

        // 门在第一面墙，窗在第二、三面墙，放不下就不生成
        if let Some(wall) = walls.first()
            && wall.length() > DOOR_SIZE.0
        {
            openings.push(Opening {
                id: "door-1".to_string(),
                wall_id: wall.id.clone(),
                kind: OpeningKind::Door,
                width: DOOR_SIZE.0,
                height: DOOR_SIZE.1,
                offset: (wall.length() - DOOR_SIZE.0) / 2.0,
                sill_height: 0.0,
            });
        }

        for (n, wall) in walls.iter().skip(1).take(2).enumerate() {
            if wall.length() <= WINDOW_SIZE.0 || wall.height <= WINDOW_SILL + WINDOW_SIZE.1 {
                continue;
            }
            openings.push(Opening {
                id: format!("window-{}", n + 1),
                wall_id: wall.id.clone(),
                kind: OpeningKind::Window,
                width: WINDOW_SIZE.0,
                height: WINDOW_SIZE.1,
                offset: (wall.length() - WINDOW_SIZE.0) / 2.0,
                sill_height: WINDOW_SILL,
            });
        }

        openings
    }

    fn scene_objects(&self) -> Vec<SceneObject> {
        let mut objects = vec![
            scene_object("floor", "Floor slab", "floor"),
            scene_object("roof", "Roof", "roof"),
        ];
        objects.extend(
            self.walls()
                .iter()
                .map(|w| scene_object(&w.id, &format!("Wall {}", w.id), "wall")),
        );
        objects.extend(self.openings().iter().map(|o| {
            let kind = match o.kind {
                OpeningKind::Door => "door",
                OpeningKind::Window => "window",
            };
            scene_object(&o.id, &format!("{} on {}", kind, o.wall_id), kind)
        }));
        objects
    }
}

impl Default for DemoConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationService for DemoConfigurator {
    fn get_configuration(&self) -> ServiceResult<BuildingConfiguration> {
        self.guard(ServiceKind::Configuration)?;
        Ok(self.configuration())
    }

    fn get_dimensions(&self) -> ServiceResult<Dimensions> {
        self.guard(ServiceKind::Configuration)?;
        Ok(self.state.borrow().configuration.dimensions)
    }

    fn set_dimensions(&self, dimensions: Dimensions) -> ServiceResult<()> {
        self.guard(ServiceKind::Configuration)?;
        if !dimensions.is_valid() || dimensions.width == 0.0 || dimensions.length == 0.0 {
            return Err(ServiceError::InvalidArgument(format!(
                "dimensions must be positive, got {}",
                dimensions
            )));
        }
        self.state.borrow_mut().configuration.dimensions = dimensions;
        Ok(())
    }

    fn export_configuration(&self) -> ServiceResult<String> {
        self.guard(ServiceKind::Configuration)?;
        serde_json::to_string_pretty(&self.configuration())
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

impl BuildingService for DemoConfigurator {
    fn get_building_geometry(&self) -> ServiceResult<Option<BuildingGeometry>> {
        self.guard(ServiceKind::Building)?;
        let config = self.configuration();
        let (extra_vertices, face_count, roof_height) = match config.roof {
            RoofType::Flat => (0, 6, 0.0),
            RoofType::Shed => (0, 6, config.dimensions.width * 0.15),
            RoofType::Gable => (2, 7, config.dimensions.width * 0.25),
            RoofType::Hip => (2, 9, config.dimensions.width * 0.25),
        };

        Ok(Some(BuildingGeometry {
            footprint: footprint(&config.dimensions).to_vec(),
            total_height: storey_height(&config) + roof_height,
            vertex_count: 8 + extra_vertices,
            face_count,
        }))
    }

    fn get_floor_area(&self) -> ServiceResult<f64> {
        self.guard(ServiceKind::Building)?;
        let config = self.configuration();
        let Dimensions { width, length, .. } = config.dimensions;
        Ok(width * length * f64::from(config.floors))
    }

    fn get_volume(&self) -> ServiceResult<f64> {
        self.guard(ServiceKind::Building)?;
        let config = self.configuration();
        let Dimensions { width, length, .. } = config.dimensions;
        Ok(width * length * storey_height(&config))
    }
}

impl WallService for DemoConfigurator {
    fn get_walls(&self) -> ServiceResult<Vec<Wall>> {
        self.guard(ServiceKind::Walls)?;
        Ok(self.walls())
    }

    fn get_wall_count(&self) -> ServiceResult<usize> {
        self.guard(ServiceKind::Walls)?;
        Ok(self.walls().len())
    }

    /// 净面积：扣除门窗洞口
    fn get_total_wall_area(&self) -> ServiceResult<f64> {
        self.guard(ServiceKind::Walls)?;
        let gross: f64 = self.walls().iter().map(Wall::area).sum();
        let cut: f64 = self.openings().iter().map(|o| o.width * o.height).sum();
        Ok(gross - cut)
    }
}

impl OpeningService for DemoConfigurator {
    fn get_openings(&self) -> ServiceResult<Vec<Opening>> {
        self.guard(ServiceKind::Openings)?;
        Ok(self.openings())
    }

    fn get_doors(&self) -> ServiceResult<Vec<Opening>> {
        self.guard(ServiceKind::Openings)?;
        Ok(filter_openings(self.openings(), OpeningKind::Door))
    }

    fn get_windows(&self) -> ServiceResult<Vec<Opening>> {
        self.guard(ServiceKind::Openings)?;
        Ok(filter_openings(self.openings(), OpeningKind::Window))
    }
}

impl MaterialService for DemoConfigurator {
    fn get_available_materials(&self) -> ServiceResult<Vec<Material>> {
        self.guard(ServiceKind::Materials)?;
        Ok(self.palette.clone())
    }

    fn get_selected_material(&self, slot: MaterialSlot) -> ServiceResult<Option<Material>> {
        self.guard(ServiceKind::Materials)?;
        let state = self.state.borrow();
        Ok(state
            .selected
            .get(&slot)
            .and_then(|id| self.palette.iter().find(|m| &m.id == id))
            .cloned())
    }

    fn set_material(&self, slot: MaterialSlot, material_id: &str) -> ServiceResult<()> {
        self.guard(ServiceKind::Materials)?;
        if !self.palette.iter().any(|m| m.id == material_id) {
            return Err(ServiceError::NotFound(format!("material '{}'", material_id)));
        }
        self.state
            .borrow_mut()
            .selected
            .insert(slot, material_id.to_string());
        Ok(())
    }
}

impl SceneService for DemoConfigurator {
    fn get_scene_objects(&self) -> ServiceResult<Vec<SceneObject>> {
        self.guard(ServiceKind::Scene)?;
        Ok(self.scene_objects())
    }

    fn get_camera_position(&self) -> ServiceResult<Option<Point3>> {
        self.guard(ServiceKind::Scene)?;
        let config = self.configuration();
        let Dimensions { width, length, .. } = config.dimensions;
        Ok(Some(Point3::new(
            width * 1.5,
            -length,
            storey_height(&config) * 2.0,
        )))
    }

    fn export_scene(&self) -> ServiceResult<String> {
        self.guard(ServiceKind::Scene)?;
        serde_json::to_string_pretty(&self.scene_objects())
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

impl ConfiguratorApp for DemoConfigurator {
    fn configuration_service(&self) -> &dyn ConfigurationService {
        self
    }

    fn building_service(&self) -> &dyn BuildingService {
        self
    }

    fn wall_service(&self) -> &dyn WallService {
        self
    }

    fn opening_service(&self) -> &dyn OpeningService {
        self
    }

    fn material_service(&self) -> &dyn MaterialService {
        self
    }

    fn scene_service(&self) -> &dyn SceneService {
        self
    }
}

fn material(id: &str, name: &str, color: &str, roughness: f64) -> Material {
    Material {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        roughness,
    }
}

fn scene_object(id: &str, name: &str, kind: &str) -> SceneObject {
    SceneObject {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        visible: true,
    }
}

fn footprint(d: &Dimensions) -> [Point2; 4] {
    [
        Point2::new(0.0, 0.0),
        Point2::new(d.width, 0.0),
        Point2::new(d.width, d.length),
        Point2::new(0.0, d.length),
    ]
}

fn storey_height(config: &BuildingConfiguration) -> f64 {
    config.dimensions.height * f64::from(config.floors)
}

fn filter_openings(openings: Vec<Opening>, kind: OpeningKind) -> Vec<Opening> {
    openings.into_iter().filter(|o| o.kind == kind).collect()
}
