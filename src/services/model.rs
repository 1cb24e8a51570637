use serde::{Deserialize, Serialize};
use std::fmt;

/// 二维平面坐标（楼层平面，单位：米）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// 三维场景坐标
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// 建筑外形尺寸（米）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
    /// 单层墙高
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    /// 所有尺寸都是有限且非负的数值
    pub fn is_valid(&self) -> bool {
        [self.width, self.length, self.height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} x {:.2} x {:.2} m",
            self.width, self.length, self.height
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofType {
    Flat,
    Gable,
    Hip,
    Shed,
}

/// 当前的建筑配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfiguration {
    pub name: String,
    pub dimensions: Dimensions,
    pub roof: RoofType,
    pub floors: u32,
}

/// 由配置生成的几何体摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingGeometry {
    /// 楼层平面轮廓（闭合，不重复首点）
    pub footprint: Vec<Point2>,
    pub total_height: f64,
    pub vertex_count: usize,
    pub face_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: String,
    pub start: Point2,
    pub end: Point2,
    pub height: f64,
    pub thickness: f64,
}

impl Wall {
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// 单面墙的面积（未扣除洞口）
    pub fn area(&self) -> f64 {
        self.length() * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// 墙上的洞口（门或窗）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: String,
    pub wall_id: String,
    pub kind: OpeningKind,
    pub width: f64,
    pub height: f64,
    /// 距墙起点的水平偏移
    pub offset: f64,
    /// 距地面的高度，门为 0
    pub sill_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    /// 十六进制颜色，如 `#c8b89a`
    pub color: String,
    pub roughness: f64,
}

/// 可以单独指定材质的构件部位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialSlot {
    Walls,
    Roof,
    Floor,
    Openings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub visible: bool,
}
