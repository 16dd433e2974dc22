//! 命令行分词与缩写展开
//!
//! 整行缩写（`en`、`conf t`、`sh ip int br` …）先展开成完整命令，再按空白切词；
//! 关键字大小写不敏感，参数保留原样。

use std::net::Ipv4Addr;

use super::error::CliError;
use crate::device::vlan_list::is_valid_vlan;
use crate::net::ipv4;

/// 整行缩写表
const LINE_ALIASES: &[(&str, &str)] = &[
    ("en", "enable"),
    ("conf t", "configure terminal"),
    ("config t", "configure terminal"),
    ("sh ip int br", "show ip interface brief"),
    ("show ip int br", "show ip interface brief"),
    ("sh ip ro", "show ip route"),
    ("sh ip route", "show ip route"),
    ("sh run", "show running-config"),
    ("show run", "show running-config"),
    ("sh access-lists", "show access-lists"),
    ("sh ip nat tr", "show ip nat translations"),
    ("sh ip nat st", "show ip nat statistics"),
    ("clear ip nat trans", "clear ip nat translation *"),
    ("clear ip nat translations", "clear ip nat translation *"),
    ("clear ip nat translations *", "clear ip nat translation *"),
    ("wr", "write memory"),
    ("wr mem", "write memory"),
    ("copy run start", "write memory"),
    ("copy running-config startup-config", "write memory"),
    ("shut", "shutdown"),
    ("no shut", "no shutdown"),
    ("show stp", "show spanning-tree"),
    ("show etherchannel", "show etherchannel summary"),
    ("show lacp neighbors", "show lacp neighbor"),
    ("sh vlan br", "show vlan brief"),
    ("sh mac address-table", "show mac address-table"),
];

/// 句首单词缩写
const WORD_ALIASES: &[(&str, &str)] = &[("sh", "show"), ("int", "interface"), ("conf", "configure")];

/// 一行输入：原始文本与切好的词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub raw: String,
    pub words: Vec<String>,
}

impl Line {
    pub fn parse(input: &str) -> Self {
        let raw = expand_aliases(input);
        let words = raw.split_whitespace().map(str::to_string).collect();
        Self { raw, words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 整行与关键字序列完全一致
    pub fn is(&self, keywords: &str) -> bool {
        let kw: Vec<&str> = keywords.split_whitespace().collect();
        kw.len() == self.words.len() && self.starts_with(&kw)
    }

    pub fn starts_with(&self, keywords: &[&str]) -> bool {
        keywords.len() <= self.words.len()
            && keywords
                .iter()
                .zip(&self.words)
                .all(|(k, w)| k.eq_ignore_ascii_case(w))
    }
}

/// 展开整行缩写与句首单词缩写
pub fn expand_aliases(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some((_, full)) = LINE_ALIASES
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(&collapsed))
    {
        return (*full).to_string();
    }
    let Some((first, rest)) = collapsed.split_once(' ') else {
        return collapsed;
    };
    match WORD_ALIASES
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(first))
    {
        Some((_, full)) => format!("{full} {rest}"),
        None => collapsed,
    }
}

/// 命令参数（已去掉匹配到的关键字前缀）
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    words: &'a [String],
}

impl<'a> Args<'a> {
    pub fn new(words: &'a [String]) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&'a str> {
        self.words.get(i).map(String::as_str)
    }

    /// 必需参数；缺失时为 `% Incomplete command.`
    pub fn req(&self, i: usize) -> Result<&'a str, CliError> {
        self.get(i).ok_or(CliError::IncompleteCommand)
    }

    /// 从第 i 个词起的剩余文本
    pub fn rest(&self, i: usize) -> String {
        self.words.get(i..).map(|w| w.join(" ")).unwrap_or_default()
    }

    pub fn keyword(&self, i: usize, kw: &str) -> bool {
        self.get(i).is_some_and(|w| w.eq_ignore_ascii_case(kw))
    }

    pub fn ip(&self, i: usize) -> Result<Ipv4Addr, CliError> {
        parse_ip(self.req(i)?)
    }

    pub fn number<T: std::str::FromStr>(&self, i: usize) -> Result<T, CliError> {
        self.req(i)?.parse().map_err(|_| CliError::InvalidSyntax)
    }

    pub fn vlan(&self, i: usize) -> Result<u16, CliError> {
        parse_vlan(self.req(i)?)
    }
}

pub fn parse_ip(s: &str) -> Result<Ipv4Addr, CliError> {
    ipv4::parse_ipv4(s).ok_or(CliError::InvalidSyntax)
}

pub fn parse_vlan(s: &str) -> Result<u16, CliError> {
    match s.trim().parse::<i64>() {
        Ok(v) if is_valid_vlan(v) => Ok(v as u16),
        _ => Err(CliError::Invalid("VLAN id")),
    }
}

/// 命令表中的一项：关键字前缀 → 处理函数
pub struct Command<S> {
    pub keywords: &'static [&'static str],
    pub handler: fn(&mut S, &mut crate::net::Network, Args<'_>) -> super::error::CliResult,
}

/// 在命令表中找关键字最长的匹配项并执行；没有匹配时返回 `None`。
pub fn dispatch<S>(
    table: &[Command<S>],
    session: &mut S,
    net: &mut crate::net::Network,
    line: &Line,
) -> Option<super::error::CliResult> {
    let cmd = table
        .iter()
        .filter(|c| line.starts_with(c.keywords))
        .max_by_key(|c| c.keywords.len())?;
    let args = Args::new(&line.words[cmd.keywords.len()..]);
    Some((cmd.handler)(session, net, args))
}
