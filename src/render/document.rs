
/// Document sections in paint order. Fragments are emitted sorted by layer,
/// and in push order within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Defs,
    Background,
    Body,
    Overlay,
}

#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: f32,
    height: f32,
    fragments: Vec<(Layer, String)>,
}

impl SvgDocument {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            fragments: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: Layer, markup: String) {
        if !markup.is_empty() {
            self.fragments.push((layer, markup));
        }
    }

    pub fn finish(mut self) -> String {
        self.fragments.sort_by_key(|(layer, _)| *layer);

        let (width, height) = (self.width, self.height);
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" style=\"shape-rendering: geometricPrecision; text-rendering: optimizeLegibility;\">"
        ));

        svg.push_str("<defs>");
        for (_, markup) in self.fragments.iter().filter(|(layer, _)| *layer == Layer::Defs) {
            svg.push_str(markup);
        }
        svg.push_str("</defs>");

        for (_, markup) in self.fragments.iter().filter(|(layer, _)| *layer != Layer::Defs) {
            svg.push_str(markup);
        }
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_follow_layer_order() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        doc.push(Layer::Overlay, "<text>title</text>".to_string());
        doc.push(Layer::Body, "<circle/>".to_string());
        doc.push(Layer::Defs, "<style>x</style>".to_string());
        doc.push(Layer::Background, "<rect/>".to_string());
        doc.push(Layer::Body, "<line/>".to_string());
        let svg = doc.finish();

        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"50\" viewBox=\"0 0 100 50\""
        ));
        assert!(svg.ends_with("</svg>"));
        let pos = |needle: &str| svg.find(needle).unwrap();
        assert!(pos("<defs><style>x</style></defs>") < pos("<rect/>"));
        assert!(pos("<rect/>") < pos("<circle/>"));
        assert!(pos("<circle/>") < pos("<line/>"));
        assert!(pos("<line/>") < pos("<text>title</text>"));
    }

    #[test]
    fn empty_fragments_are_dropped() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.push(Layer::Background, String::new());
        let svg = doc.finish();
        assert!(svg.ends_with("<defs></defs></svg>"));
    }
}
