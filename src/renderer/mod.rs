//! Responsible for rendering templates

mod call_stack;
mod for_loop;
mod processor;
mod renderer;
mod stack_frame;

#[cfg(test)]
mod tests;

pub use self::renderer::Renderer;
