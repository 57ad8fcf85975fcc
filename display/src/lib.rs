pub use renderer::Renderer;

mod renderer;
