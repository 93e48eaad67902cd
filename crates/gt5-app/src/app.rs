//! Application shell: applies recorded input to a canvas and runs
//! save, load and export requests.

use gt5_core::canvas::{Canvas, DrawingStore, PointerEvent};
use gt5_core::config::{ConfigError, DrawingConfig};
use gt5_core::error::DrawingError;
use gt5_core::layer::LayerId;
use gt5_core::shortcuts::KeyInput;
use gt5_core::storage::{DrawingLibrary, Storage, StorageError};
use gt5_core::style::SerializableColor;
use gt5_core::tools::ToolKind;
use gt5_render::export::{ExportError, ExportFormat, ExportOptions, default_file_name, export};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Drawing(#[from] DrawingError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No saved drawing with id {0}")]
    DrawingNotFound(i64),
}

/// One recorded input or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Key(KeyInput),
    /// Container resized; the canvas is refit.
    Resize { width: u32, height: u32 },
    SetTool { tool: ToolKind },
    SetColor { color: SerializableColor },
    SetBrushSize { size: f64 },
    AddLayer,
    ToggleLayerVisibility { id: LayerId },
    ToggleLayerLock { id: LayerId },
    SetActiveLayer { id: LayerId },
    DeleteLayer { id: LayerId },
    Undo,
    Redo,
    Save {
        #[serde(default)]
        name: Option<String>,
    },
    Load { id: i64 },
    Export {
        format: String,
        /// File name inside the output directory; generated when absent.
        #[serde(default)]
        file: Option<String>,
    },
}

/// What applying an event produced beyond state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    None,
    Saved(i64),
    Loaded(i64),
    Exported(PathBuf),
}

/// Totals from replaying a script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub applied: usize,
    /// Events refused by the drawing rules, such as drawing on a locked layer.
    pub rejected: usize,
    pub saved: Vec<i64>,
    pub exported: Vec<PathBuf>,
}

/// Parse a JSON array of events.
pub fn parse_script(json: &str) -> Result<Vec<AppEvent>, AppError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<AppEvent>, AppError> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_script(&json)
}

/// Headless application.
pub struct App<S: Storage> {
    canvas: Canvas,
    library: DrawingLibrary<S>,
    output_dir: PathBuf,
}

impl<S: Storage> App<S> {
    pub fn new(config: DrawingConfig, storage: Arc<S>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            canvas: Canvas::new(config),
            library: DrawingLibrary::new(storage),
            output_dir: output_dir.into(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn store(&self) -> &DrawingStore {
        self.canvas.store()
    }

    pub fn library(&self) -> &DrawingLibrary<S> {
        &self.library
    }

    /// Apply every event in order.
    ///
    /// Events refused by the drawing rules are logged and counted; any
    /// other error stops the replay.
    pub async fn replay(&mut self, events: Vec<AppEvent>) -> Result<ReplaySummary, AppError> {
        let mut summary = ReplaySummary::default();
        for (i, event) in events.into_iter().enumerate() {
            match self.apply(event).await {
                Ok(outcome) => {
                    summary.applied += 1;
                    match outcome {
                        EventOutcome::Saved(id) => summary.saved.push(id),
                        EventOutcome::Exported(path) => summary.exported.push(path),
                        EventOutcome::Loaded(_) | EventOutcome::None => {}
                    }
                }
                Err(AppError::Drawing(e)) => {
                    log::warn!("Event {i} rejected: {e}");
                    summary.rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }

    /// Apply a single event.
    pub async fn apply(&mut self, event: AppEvent) -> Result<EventOutcome, AppError> {
        log::trace!("Event: {event:?}");
        match event {
            AppEvent::PointerDown { x, y } => {
                self.canvas.handle_pointer(PointerEvent::Down { x, y })?
            }
            AppEvent::PointerMove { x, y } => {
                self.canvas.handle_pointer(PointerEvent::Move { x, y })?
            }
            AppEvent::PointerUp { x, y } => self.canvas.handle_pointer(PointerEvent::Up { x, y })?,
            AppEvent::Key(input) => {
                self.canvas.handle_key(&input);
            }
            AppEvent::Resize { width, height } => self.canvas.handle_resize(width, height),
            AppEvent::SetTool { tool } => self.canvas.store_mut().set_tool(tool),
            AppEvent::SetColor { color } => self.canvas.store_mut().set_color(color),
            AppEvent::SetBrushSize { size } => self.canvas.store_mut().set_brush_size(size),
            AppEvent::AddLayer => {
                self.canvas.store_mut().add_layer()?;
            }
            AppEvent::ToggleLayerVisibility { id } => {
                self.canvas.store_mut().toggle_layer_visibility(id)?;
            }
            AppEvent::ToggleLayerLock { id } => {
                self.canvas.store_mut().toggle_layer_lock(id)?;
            }
            AppEvent::SetActiveLayer { id } => self.canvas.store_mut().set_active_layer(id)?,
            AppEvent::DeleteLayer { id } => {
                self.canvas.delete_layer(id)?;
            }
            AppEvent::Undo => {
                self.canvas.undo();
            }
            AppEvent::Redo => {
                self.canvas.redo();
            }
            AppEvent::Save { name } => {
                let id = self.save(name.as_deref()).await?;
                return Ok(EventOutcome::Saved(id));
            }
            AppEvent::Load { id } => {
                self.load(id).await?;
                return Ok(EventOutcome::Loaded(id));
            }
            AppEvent::Export { format, file } => {
                let format: ExportFormat = format.parse()?;
                let path = self.export_to_file(format, file.as_deref())?;
                return Ok(EventOutcome::Exported(path));
            }
        }
        Ok(EventOutcome::None)
    }

    /// Save the current drawing to the library.
    pub async fn save(&self, name: Option<&str>) -> Result<i64, AppError> {
        let data = self.canvas.store().to_data();
        Ok(self.library.save(data, name).await?)
    }

    /// Replace the current drawing with a saved one.
    pub async fn load(&mut self, id: i64) -> Result<(), AppError> {
        let data = self
            .library
            .load(id)
            .await?
            .ok_or(AppError::DrawingNotFound(id))?;
        let config = self.canvas.store().config().clone();
        self.canvas = Canvas::with_store(DrawingStore::from_data(data, config)?);
        log::info!("Loaded drawing {id}");
        Ok(())
    }

    /// Export the drawing into the output directory.
    pub fn export_to_file(
        &self,
        format: ExportFormat,
        file: Option<&str>,
    ) -> Result<PathBuf, AppError> {
        let store = self.canvas.store();
        let options = ExportOptions::new(format, &store.config().export);
        let image = export(store, &options)?;

        let file_name = match file {
            Some(file) => file.to_string(),
            None => default_file_name(None, format),
        };
        std::fs::create_dir_all(&self.output_dir).map_err(|source| AppError::Io {
            path: self.output_dir.display().to_string(),
            source,
        })?;
        let path = self.output_dir.join(file_name);
        image.write_to(&path)?;
        Ok(path)
    }
}
