/// WebSocket upgrade map, indented for the top of an `http` block.
pub const UPGRADE_MAP_BLOCK: &str = concat!(
    "    map $http_upgrade $connection_upgrade {\n",
    "        default upgrade;\n",
    "        \"\"      close;\n",
    "    }\n",
);
