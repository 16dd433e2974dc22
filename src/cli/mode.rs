//! 会话模式

/// IOS 会话所处的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    UserExec,
    PrivExec,
    GlobalConfig,
    InterfaceConfig,
    DhcpPoolConfig,
    AclConfig,
    RouterOspfConfig,
    LineConsoleConfig,
    VlanConfig,
}

impl Mode {
    /// 提示符中主机名之后的部分
    pub fn prompt_suffix(self) -> &'static str {
        match self {
            Mode::UserExec => ">",
            Mode::PrivExec => "#",
            Mode::GlobalConfig => "(config)#",
            Mode::InterfaceConfig => "(config-if)#",
            Mode::DhcpPoolConfig => "(dhcp-config)#",
            Mode::AclConfig => "(config-ext-nacl)#",
            Mode::RouterOspfConfig => "(config-router)#",
            Mode::LineConsoleConfig => "(config-line)#",
            Mode::VlanConfig => "(config-vlan)#",
        }
    }

    pub fn is_exec(self) -> bool {
        matches!(self, Mode::UserExec | Mode::PrivExec)
    }

    /// GlobalConfig 之下的子模式
    pub fn is_submode(self) -> bool {
        !self.is_exec() && self != Mode::GlobalConfig
    }
}

pub const CONFIG_BANNER: &str = "Enter configuration commands, one per line. End with CNTL/Z.";
