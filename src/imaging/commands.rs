//! The imaging command catalog.
//!
//! Only `GetImagingSettings` talks to the device today. The remaining
//! commands already expose their final shape and always fail with
//! [`ImagingError::NotImplemented`], without validating arguments or touching
//! the transport.

use crate::errors::ImagingError;
use crate::imaging::completion::{deliver, Completion, Dispatched, Pending};
use crate::imaging::dispatcher::ImagingService;
use crate::soap::envelope::escape_text;
use crate::soap::transport::SoapResponse;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImagingCommand {
    GetImagingSettings,
    SetImagingSettings,
    GetOptions,
    GetPresets,
    GetCurrentPreset,
    SetCurrentPreset,
    Move,
    Stop,
    GetStatus,
    GetServiceCapabilities,
}

impl ImagingCommand {
    pub const ALL: [ImagingCommand; 10] = [
        ImagingCommand::GetImagingSettings,
        ImagingCommand::SetImagingSettings,
        ImagingCommand::GetOptions,
        ImagingCommand::GetPresets,
        ImagingCommand::GetCurrentPreset,
        ImagingCommand::SetCurrentPreset,
        ImagingCommand::Move,
        ImagingCommand::Stop,
        ImagingCommand::GetStatus,
        ImagingCommand::GetServiceCapabilities,
    ];

    /// SOAP element name on the wire.
    pub fn method_name(self) -> &'static str {
        match self {
            ImagingCommand::GetImagingSettings => "GetImagingSettings",
            ImagingCommand::SetImagingSettings => "SetImagingSettings",
            ImagingCommand::GetOptions => "GetOptions",
            ImagingCommand::GetPresets => "GetPresets",
            ImagingCommand::GetCurrentPreset => "GetCurrentPreset",
            ImagingCommand::SetCurrentPreset => "SetCurrentPreset",
            ImagingCommand::Move => "Move",
            ImagingCommand::Stop => "Stop",
            ImagingCommand::GetStatus => "GetStatus",
            ImagingCommand::GetServiceCapabilities => "GetServiceCapabilities",
        }
    }

    /// Client-side operation name used in error messages.
    pub fn operation_name(self) -> &'static str {
        match self {
            ImagingCommand::GetImagingSettings => "getImagingSettings",
            ImagingCommand::SetImagingSettings => "setImagingSettings",
            ImagingCommand::GetOptions => "getOptions",
            ImagingCommand::GetPresets => "getPresets",
            ImagingCommand::GetCurrentPreset => "getCurrentPreset",
            ImagingCommand::SetCurrentPreset => "setCurrentPreset",
            ImagingCommand::Move => "move",
            ImagingCommand::Stop => "stop",
            ImagingCommand::GetStatus => "getImagingStatus",
            ImagingCommand::GetServiceCapabilities => "getCapabilities",
        }
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, ImagingCommand::GetImagingSettings)
    }
}

impl fmt::Display for ImagingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

fn not_implemented(command: ImagingCommand, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
    let operation = command.operation_name();
    deliver(operation, Err(ImagingError::NotImplemented { operation }), callback)
}

impl ImagingService {
    /// Fetches the imaging settings of a video source.
    ///
    /// `profile_token` falls back to the default profile token; after that
    /// it must be a non-empty string.
    pub fn get_imaging_settings(
        &self,
        profile_token: Option<&str>,
        callback: Option<Completion<SoapResponse>>,
    ) -> Dispatched<SoapResponse> {
        let operation = ImagingCommand::GetImagingSettings.operation_name();
        deliver(operation, self.prepare_get_imaging_settings(profile_token), callback)
    }

    fn prepare_get_imaging_settings(&self, profile_token: Option<&str>) -> Result<Pending<SoapResponse>, ImagingError> {
        let operation = ImagingCommand::GetImagingSettings.operation_name();
        let token = match profile_token.filter(|t| !t.is_empty()) {
            Some(token) => Some(token),
            None => self.default_profile_token(),
        };
        let token = match token {
            Some(t) if !t.is_empty() => t,
            Some(_) => {
                return Err(ImagingError::ArgumentInvalid {
                    operation,
                    argument: "profileToken",
                    expected: "a non-empty string",
                    details: "got an empty string".to_string(),
                })
            }
            None => {
                return Err(ImagingError::ArgumentInvalid {
                    operation,
                    argument: "profileToken",
                    expected: "a non-empty string",
                    details: "none was given and no default profile token is set".to_string(),
                })
            }
        };

        let body = format!("<timg:VideoSourceToken>{}</timg:VideoSourceToken>", escape_text(token));
        self.prepare_request(
            operation,
            Some(ImagingCommand::GetImagingSettings.method_name()),
            Some(&body),
        )
    }

    pub fn set_imaging_settings(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::SetImagingSettings, callback)
    }

    pub fn get_options(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::GetOptions, callback)
    }

    pub fn get_presets(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::GetPresets, callback)
    }

    pub fn get_current_preset(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::GetCurrentPreset, callback)
    }

    pub fn set_current_preset(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::SetCurrentPreset, callback)
    }

    /// Focus move (`Move`).
    pub fn move_focus(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::Move, callback)
    }

    pub fn stop(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::Stop, callback)
    }

    pub fn get_imaging_status(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::GetStatus, callback)
    }

    pub fn get_capabilities(&self, callback: Option<Completion<SoapResponse>>) -> Dispatched<SoapResponse> {
        not_implemented(ImagingCommand::GetServiceCapabilities, callback)
    }

    /// Runs any catalog command with its default arguments.
    pub fn run_command(
        &self,
        command: ImagingCommand,
        callback: Option<Completion<SoapResponse>>,
    ) -> Dispatched<SoapResponse> {
        match command {
            ImagingCommand::GetImagingSettings => self.get_imaging_settings(None, callback),
            ImagingCommand::SetImagingSettings => self.set_imaging_settings(callback),
            ImagingCommand::GetOptions => self.get_options(callback),
            ImagingCommand::GetPresets => self.get_presets(callback),
            ImagingCommand::GetCurrentPreset => self.get_current_preset(callback),
            ImagingCommand::SetCurrentPreset => self.set_current_preset(callback),
            ImagingCommand::Move => self.move_focus(callback),
            ImagingCommand::Stop => self.stop(callback),
            ImagingCommand::GetStatus => self.get_imaging_status(callback),
            ImagingCommand::GetServiceCapabilities => self.get_capabilities(callback),
        }
    }
}
