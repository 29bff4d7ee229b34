pub const FORM_ID: &str = "shorten-form";
pub const LINK_INPUT_ID: &str = "link-input";
pub const SHORTLINK_INPUT_ID: &str = "shortlink-input";

/// The parts of the dashboard page the shorten form touches.
pub trait Page {
    /// Current value of the input with the given element id, `None` if there is no such input.
    fn input_value(&self, id: &str) -> Option<String>;

    /// Shows a message the user has to acknowledge.
    fn alert(&self, message: &str);

    /// Reloads the page so it shows the server's current state.
    fn reload(&self);
}

pub trait SubmitEvent {
    /// Stops the host from running its own form submission.
    fn prevent_default(&self);
}
