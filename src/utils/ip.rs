//! IP 地址处理工具
//!
//! 提供统一的客户端 IP 提取功能，支持：
//! - 可信代理配置（trusted_proxies）
//! - CIDR 匹配
//! - 私有 IP 自动检测

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// 解析 `ip` 或 `ip:port`
fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.parse::<SocketAddr>()
        .map(|addr| addr.ip())
        .or_else(|_| raw.parse::<IpAddr>())
        .ok()
}

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &IpAddr, trusted_proxies: &[String]) -> bool {
    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(ip, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|addr| addr == *ip)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false,
    }
}

/// 根据连接 IP 与转发头决定客户端 IP
///
/// 1. 显式配置 trusted_proxies 且匹配 → 使用转发头
/// 2. 未配置 trusted_proxies 且连接来自私有 IP → 视为反向代理，使用转发头
/// 3. 其余情况使用连接 IP
pub fn resolve_client_ip(
    peer: Option<IpAddr>,
    forwarded: Option<IpAddr>,
    trusted_proxies: &[String],
) -> Option<IpAddr> {
    let peer_ip = peer?;

    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(&peer_ip, trusted_proxies) {
            let real_ip = forwarded.unwrap_or(peer_ip);
            debug!("Trusted proxy (explicit): {} -> {}", peer_ip, real_ip);
            return Some(real_ip);
        }
        return Some(peer_ip);
    }

    if is_private_or_local(&peer_ip)
        && let Some(real_ip) = forwarded
    {
        debug!(
            "Auto-detect proxy (private IP {}): using forwarded IP {}",
            peer_ip, real_ip
        );
        return Some(real_ip);
    }

    Some(peer_ip)
}

/// 从 HttpRequest 提取真实客户端 IP，无法确定时返回 0.0.0.0
pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> IpAddr {
    let peer = req.peer_addr().map(|addr| addr.ip());
    let forwarded = extract_forwarded_ip_from_headers(req.headers());

    resolve_client_ip(peer, forwarded, trusted_proxies)
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// 从请求头提取转发的 IP（X-Forwarded-For 或 X-Real-IP）
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| parse_ip(s.trim()))
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| parse_ip(s.trim()))
        })
}
