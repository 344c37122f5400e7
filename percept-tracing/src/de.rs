//! Deserialize tracing log in JSON format

use percept_api::Extra;
use serde::{de::DeserializeOwned, Deserialize};

pub type Timestamp = chrono::DateTime<chrono::Utc>;

pub fn from_str(lines: &str) -> Result<Vec<TracingLog>, percept_api::Error> {
    let mut res = vec![];
    for line in lines.lines() {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| percept_api::Error::Other(e.into()))?;
        // ignore unrelated line and log for other target (library/binary/module).
        if !matches!(value.get("target"), Some(target) if target == "percept_tracing") {
            continue;
        }
        let Some(method) = value
            .get("fields")
            .and_then(|fields| fields.get("method"))
            .and_then(serde_json::Value::as_str)
        else {
            continue;
        };
        let log = match method {
            "percept_api::PointCloudCamera::next_point_cloud" => {
                TracingLog::NextPointCloud(parse(value)?)
            }
            "percept_api::VisionService::detections_from_camera" => {
                TracingLog::DetectionsFromCamera(parse(value)?)
            }
            "percept_api::VisionService::detections" => TracingLog::Detections(parse(value)?),
            "percept_api::VisionService::classifications_from_camera" => {
                TracingLog::ClassificationsFromCamera(parse(value)?)
            }
            "percept_api::VisionService::classifications" => {
                TracingLog::Classifications(parse(value)?)
            }
            "percept_api::VisionService::object_point_clouds" => {
                TracingLog::ObjectPointClouds(parse(value)?)
            }
            "percept_api::VisionService::do_command" => TracingLog::DoCommand(parse(value)?),
            "percept_api::VisionService::close" => TracingLog::Close(parse(value)?),
            _ => continue,
        };
        res.push(log);
    }
    Ok(res)
}

fn parse<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, percept_api::Error> {
    serde_json::from_value(value).map_err(|e| percept_api::Error::Other(e.into()))
}

#[derive(Debug)]
#[non_exhaustive]
pub enum TracingLog {
    /// [`percept_api::PointCloudCamera::next_point_cloud`]
    NextPointCloud(NextPointCloudLog),

    /// [`percept_api::VisionService::detections_from_camera`]
    DetectionsFromCamera(DetectionsFromCameraLog),
    /// [`percept_api::VisionService::detections`]
    Detections(ImageLog),
    /// [`percept_api::VisionService::classifications_from_camera`]
    ClassificationsFromCamera(ClassificationsFromCameraLog),
    /// [`percept_api::VisionService::classifications`]
    Classifications(ImageLog),
    /// [`percept_api::VisionService::object_point_clouds`]
    ObjectPointClouds(ObjectPointCloudsLog),
    /// [`percept_api::VisionService::do_command`]
    DoCommand(DoCommandLog),
    /// [`percept_api::VisionService::close`]
    Close(CloseLog),
}

#[derive(Deserialize)]
struct RawTracingLog<Fields> {
    timestamp: Timestamp,
    fields: Fields,
}

// =============================================================================
// percept_api::PointCloudCamera

#[derive(Debug)]
#[non_exhaustive]
pub struct NextPointCloudLog {
    pub timestamp: Timestamp,
    pub num_points: usize,
}

impl<'de> Deserialize<'de> for NextPointCloudLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            num_points: usize,
        }
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
            num_points: v.fields.num_points,
        })
    }
}

// =============================================================================
// percept_api::VisionService

#[derive(Debug)]
#[non_exhaustive]
pub struct DetectionsFromCameraLog {
    pub timestamp: Timestamp,
    pub camera_name: String,
}

impl<'de> Deserialize<'de> for DetectionsFromCameraLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            camera_name: String,
        }
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
            camera_name: v.fields.camera_name,
        })
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct ClassificationsFromCameraLog {
    pub timestamp: Timestamp,
    pub camera_name: String,
    pub n: usize,
}

impl<'de> Deserialize<'de> for ClassificationsFromCameraLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            camera_name: String,
            n: usize,
        }
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
            camera_name: v.fields.camera_name,
            n: v.fields.n,
        })
    }
}

// Shared by `detections` and `classifications`; `n` is absent for detections.
#[derive(Debug)]
#[non_exhaustive]
pub struct ImageLog {
    pub timestamp: Timestamp,
    pub image_width: u32,
    pub image_height: u32,
    pub n: Option<usize>,
}

impl<'de> Deserialize<'de> for ImageLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            image_width: u32,
            image_height: u32,
            #[serde(default)]
            n: Option<usize>,
        }
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
            image_width: v.fields.image_width,
            image_height: v.fields.image_height,
            n: v.fields.n,
        })
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct ObjectPointCloudsLog {
    pub timestamp: Timestamp,
    pub camera_name: String,
    pub num_objects: usize,
}

impl<'de> Deserialize<'de> for ObjectPointCloudsLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            camera_name: String,
            num_objects: usize,
        }
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
            camera_name: v.fields.camera_name,
            num_objects: v.fields.num_objects,
        })
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct DoCommandLog {
    pub timestamp: Timestamp,
    pub command: Extra,
}

impl<'de> Deserialize<'de> for DoCommandLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {
            command: String,
        }
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
            command: serde_json::from_str(&v.fields.command).map_err(serde::de::Error::custom)?,
        })
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct CloseLog {
    pub timestamp: Timestamp,
}

impl<'de> Deserialize<'de> for CloseLog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Fields {}
        let v = RawTracingLog::<Fields>::deserialize(deserializer)?;
        Ok(Self {
            timestamp: v.timestamp,
        })
    }
}
