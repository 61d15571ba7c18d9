/// GPU copy of the current base image.
#[derive(Default)]
pub struct TextureState {
    pub texture: Option<egui::TextureHandle>,
}

impl TextureState {
    pub fn id(&self) -> Option<egui::TextureId> {
        self.texture.as_ref().map(|t| t.id())
    }
}
