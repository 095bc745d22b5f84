// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Compositing error: {0}")]
    Composite(String), // Canvas and camera frame no longer line up
    #[error("Landmark helper error: {0}")]
    Landmarker(String), // Spawning or talking to the hand landmark helper failed
    #[error("Config error: {0}")]
    Config(String), // A command line value is out of range
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed landmark reply: {0}")]
    Json(#[from] serde_json::Error),
}
