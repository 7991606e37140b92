//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Chime Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[notifications]
# Show a system notification for incoming messages.
enabled = true
# Play an audio cue. Independent of `enabled`.
play_sound = true
# Use the sender's avatar as the notification icon.
show_avatars = true
# Alert even for the conversation that is currently open.
always_notify = false
# badge = "ic_notification.png"

[sounds]
# asset_dir = "sounds"
# preload = ["attention", "chat", "login", "logout", "modalert", "newnote", "system"]
# Each cue ships once per codec: {asset_dir}/{name}.{extension}
# codecs = [
#   { mime = "audio/mpeg", extension = "mp3" },
#   { mime = "audio/wav", extension = "wav" },
#   { mime = "audio/ogg", extension = "ogg" },
# ]

[bridge]
# start_url = "chime://localhost/index.html"
# assets_dir = "assets"
# Empty uses the platform data directory.
# data_dir = ""
# backlog_limit = 100
# devtools = false

[logging]
# TRACE, DEBUG, INFO, WARNING, ERROR
level = "INFO"
"##
    .to_string()
}
