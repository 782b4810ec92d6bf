use super::{BodySpec, OperationDef, OperationKind, ParamKind, PathParam};
use crate::services::transport::HttpMethod::{Delete, Get, Patch, Post, Put};

const DEVICE_ID: &[PathParam] = &[PathParam::new("deviceId", ParamKind::Identifier)];
const PLUGIN_NAME: &[PathParam] = &[PathParam::new("pluginName", ParamKind::PluginName)];
const UNIQUE_ID: &[PathParam] = &[PathParam::new("uniqueId", ParamKind::Identifier)];
const USER_ID: &[PathParam] = &[PathParam::new("userId", ParamKind::Identifier)];
const BACKUP_ID: &[PathParam] = &[PathParam::new("backupId", ParamKind::Identifier)];
const CACHED_UUID: &[PathParam] = &[PathParam::new("uuid", ParamKind::Identifier)];
const SEARCH_QUERY: &[PathParam] = &[PathParam::new("query", ParamKind::Text)];

pub(super) static OPERATIONS: &[OperationDef] = &[
    // auth
    OperationDef::new("auth", "login", Post, "/api/auth/login")
        .kind(OperationKind::Login)
        .public(),
    OperationDef::new("auth", "get_settings", Get, "/api/auth/settings").public(),
    OperationDef::new("auth", "check", Get, "/api/auth/check"),
    // server
    OperationDef::new("server", "restart", Put, "/api/server/restart"),
    OperationDef::new("server", "restart_child_bridge", Put, "/api/server/restart/{deviceId}")
        .path_params(DEVICE_ID),
    OperationDef::new("server", "stop_child_bridge", Put, "/api/server/stop/{deviceId}")
        .path_params(DEVICE_ID),
    OperationDef::new("server", "start_child_bridge", Put, "/api/server/start/{deviceId}")
        .path_params(DEVICE_ID),
    OperationDef::new("server", "get_pairing", Get, "/api/server/pairing"),
    OperationDef::new("server", "reset_bridge_accessory", Put, "/api/server/reset-homebridge-accessory"),
    OperationDef::new("server", "list_cached_accessories", Get, "/api/server/cached-accessories"),
    OperationDef::new("server", "delete_cached_accessory", Delete, "/api/server/cached-accessories/{uuid}")
        .path_params(CACHED_UUID)
        .query(&["cacheFile"]),
    OperationDef::new("server", "reset_cached_accessories", Put, "/api/server/reset-cached-accessories"),
    OperationDef::new("server", "list_devices", Get, "/api/server/devices"),
    OperationDef::new("server", "get_device", Get, "/api/server/devices/{deviceId}")
        .path_params(DEVICE_ID),
    OperationDef::new("server", "delete_device", Delete, "/api/server/devices/{deviceId}")
        .path_params(DEVICE_ID),
    OperationDef::new("server", "get_system_interfaces", Get, "/api/server/network-interfaces/system"),
    OperationDef::new("server", "get_bridge_interfaces", Get, "/api/server/network-interfaces/bridge"),
    OperationDef::new("server", "set_bridge_interfaces", Put, "/api/server/network-interfaces/bridge")
        .body(BodySpec::Fields(&["adapters"])),
    OperationDef::new("server", "get_mdns_advertiser", Get, "/api/server/mdns-advertiser"),
    OperationDef::new("server", "set_mdns_advertiser", Put, "/api/server/mdns-advertiser")
        .body(BodySpec::Fields(&["advertiser"])),
    OperationDef::new("server", "get_unused_port", Get, "/api/server/port/new"),
    // config editor
    OperationDef::new("config", "get", Get, "/api/config-editor"),
    OperationDef::new("config", "update", Post, "/api/config-editor").body(BodySpec::Param("config")),
    OperationDef::new("config", "get_plugin_config", Get, "/api/config-editor/plugin/{pluginName}")
        .path_params(PLUGIN_NAME),
    OperationDef::new("config", "disable_plugin", Put, "/api/config-editor/plugin/{pluginName}/disable")
        .path_params(PLUGIN_NAME),
    OperationDef::new("config", "enable_plugin", Put, "/api/config-editor/plugin/{pluginName}/enable")
        .path_params(PLUGIN_NAME),
    OperationDef::new("config", "list_backups", Get, "/api/config-editor/backups").pageable(),
    OperationDef::new("config", "get_backup", Get, "/api/config-editor/backups/{backupId}")
        .path_params(BACKUP_ID),
    OperationDef::new("config", "delete_backups", Delete, "/api/config-editor/backups"),
    // plugins
    OperationDef::new("plugins", "list", Get, "/api/plugins"),
    OperationDef::new("plugins", "search", Get, "/api/plugins/search/{query}")
        .path_params(SEARCH_QUERY),
    OperationDef::new("plugins", "lookup", Get, "/api/plugins/lookup/{pluginName}")
        .path_params(PLUGIN_NAME),
    OperationDef::new("plugins", "get_versions", Get, "/api/plugins/lookup/{pluginName}/versions")
        .path_params(PLUGIN_NAME),
    OperationDef::new("plugins", "get_config_schema", Get, "/api/plugins/config-schema/{pluginName}")
        .path_params(PLUGIN_NAME),
    OperationDef::new("plugins", "get_changelog", Get, "/api/plugins/changelog/{pluginName}")
        .path_params(PLUGIN_NAME),
    OperationDef::new("plugins", "get_alias", Get, "/api/plugins/alias/{pluginName}")
        .path_params(PLUGIN_NAME),
    // accessories
    OperationDef::new("accessories", "list", Get, "/api/accessories"),
    OperationDef::new("accessories", "get_layout", Get, "/api/accessories/layout"),
    OperationDef::new("accessories", "get", Get, "/api/accessories/{uniqueId}").path_params(UNIQUE_ID),
    OperationDef::new("accessories", "set_characteristic", Put, "/api/accessories/{uniqueId}")
        .path_params(UNIQUE_ID)
        .body(BodySpec::Fields(&["characteristicType", "value"])),
    // status
    OperationDef::new("status", "get_cpu", Get, "/api/status/cpu"),
    OperationDef::new("status", "get_ram", Get, "/api/status/ram"),
    OperationDef::new("status", "get_network", Get, "/api/status/network"),
    OperationDef::new("status", "get_uptime", Get, "/api/status/uptime"),
    OperationDef::new("status", "get_homebridge", Get, "/api/status/homebridge"),
    OperationDef::new("status", "get_child_bridges", Get, "/api/status/homebridge/child-bridges"),
    OperationDef::new("status", "get_server_information", Get, "/api/status/server-information"),
    OperationDef::new("status", "get_nodejs", Get, "/api/status/nodejs"),
    OperationDef::new("status", "get_homebridge_version", Get, "/api/status/homebridge-version"),
    // users
    OperationDef::new("users", "list", Get, "/api/users").pageable(),
    OperationDef::new("users", "create", Post, "/api/users")
        .body(BodySpec::Fields(&["username", "name", "password", "admin"])),
    OperationDef::new("users", "update", Patch, "/api/users/{userId}")
        .path_params(USER_ID)
        .body(BodySpec::Fields(&["username", "name", "password", "admin"])),
    OperationDef::new("users", "delete", Delete, "/api/users/{userId}").path_params(USER_ID),
    OperationDef::new("users", "change_password", Post, "/api/users/change-password")
        .body(BodySpec::Fields(&["currentPassword", "newPassword"])),
    OperationDef::new("users", "setup_otp", Post, "/api/users/otp/setup"),
    OperationDef::new("users", "activate_otp", Post, "/api/users/otp/activate")
        .body(BodySpec::Fields(&["code"])),
    OperationDef::new("users", "deactivate_otp", Post, "/api/users/otp/deactivate")
        .body(BodySpec::Fields(&["password"])),
    // backups
    OperationDef::new("backups", "download", Get, "/api/backup/download"),
    OperationDef::new("backups", "get_next_scheduled", Get, "/api/backup/scheduled-backups/next"),
    OperationDef::new("backups", "list_scheduled", Get, "/api/backup/scheduled-backups").pageable(),
    OperationDef::new("backups", "get_scheduled", Get, "/api/backup/scheduled-backups/{backupId}")
        .path_params(BACKUP_ID),
    OperationDef::new("backups", "restore_scheduled", Post, "/api/backup/scheduled-backups/{backupId}/restore")
        .path_params(BACKUP_ID),
    OperationDef::new("backups", "restart_after_restore", Put, "/api/backup/restart"),
    // platform tools
    OperationDef::new("platform", "restart_host", Put, "/api/platform-tools/linux/restart-host"),
    OperationDef::new("platform", "shutdown_host", Put, "/api/platform-tools/linux/shutdown-host"),
    OperationDef::new("platform", "get_startup_script", Get, "/api/platform-tools/docker/startup-script"),
    OperationDef::new("platform", "update_startup_script", Put, "/api/platform-tools/docker/startup-script")
        .body(BodySpec::Fields(&["script"])),
    OperationDef::new("platform", "restart_container", Put, "/api/platform-tools/docker/restart-container"),
    OperationDef::new(
        "platform",
        "get_startup_settings",
        Get,
        "/api/platform-tools/hb-service/homebridge-startup-settings",
    ),
    OperationDef::new(
        "platform",
        "update_startup_settings",
        Put,
        "/api/platform-tools/hb-service/homebridge-startup-settings",
    )
    .body(BodySpec::Fields(&[
        "HOMEBRIDGE_DEBUG",
        "HOMEBRIDGE_KEEP_ORPHANS",
        "HOMEBRIDGE_INSECURE",
        "ENV_DEBUG",
        "ENV_NODE_OPTIONS",
    ])),
    OperationDef::new(
        "platform",
        "set_full_service_restart_flag",
        Put,
        "/api/platform-tools/hb-service/set-full-service-restart-flag",
    ),
    // logs
    OperationDef::new("logs", "download", Get, "/api/platform-tools/hb-service/log/download")
        .query(&["colour"]),
    OperationDef::new("logs", "truncate", Put, "/api/platform-tools/hb-service/log/truncate"),
    // batch
    OperationDef::new("batch", "execute", Post, "/").kind(OperationKind::Batch),
];
