#[cfg(test)]
use mockall::mock;
use crate::app_name::AppName;
use crate::remote_error::RemoteError;
use crate::screenshot::Screenshot;
use crate::theme::Theme;

/// The two remote operations the generator depends on.
pub trait IconService {
    fn extract_names(&self, screenshot: &Screenshot) -> Result<Vec<AppName>, RemoteError>;

    fn generate_icon(&self, name: &AppName, theme: &Theme) -> Result<Vec<u8>, RemoteError>;
}

#[cfg(test)]
mock! {
    pub IconServiceStub {}

    impl IconService for IconServiceStub {
        fn extract_names(&self, screenshot: &Screenshot) -> Result<Vec<AppName>, RemoteError>;
        fn generate_icon(&self, name: &AppName, theme: &Theme) -> Result<Vec<u8>, RemoteError>;
    }
}

/// Icon prompt sent to the image model. Same name and theme always give the same text.
pub fn icon_prompt(name: &AppName, theme: &Theme) -> String {
    format!(
        "Create a {} style app icon for \"{}\". A single centered symbol on a plain rounded-square background, \
         no text, no border, flat lighting, suitable for a phone home screen.",
        theme.as_str(),
        name.as_str()
    )
}
