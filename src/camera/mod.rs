pub mod camera_entity;

pub use camera_entity::CameraEntity;
