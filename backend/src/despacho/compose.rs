//! Message composition and the WhatsApp handoff link.

use rand_core::{OsRng, RngCore};

use super::{Despacho, Modo};

const ALFABETO: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 5-character request identifier: 5 CSPRNG bytes, each reduced modulo 36
/// into the lowercase-alphanumeric alphabet.
pub fn gerar_token() -> String {
    let mut bytes = [0u8; 5];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ALFABETO[*b as usize % ALFABETO.len()] as char)
        .collect()
}

/// Renders the finalized request as the message sent to the supervisor.
///
/// WhatsApp markup: `*bold*` for the values the supervisor scans for,
/// `*_..._*` for the price suffix.
pub fn compor_mensagem(despacho: &Despacho, token: &str) -> String {
    let mut linhas = Vec::new();

    linhas.push(format!(
        "{} *{}* - Despacho #{}",
        despacho.modo.emoji(),
        despacho.modo.rotulo(),
        token
    ));

    match despacho.modo {
        Modo::Adicionar => linhas.push(format!(
            "Setor: *{}* | PDV: *{}*",
            despacho.pedido, despacho.pdv
        )),
        Modo::Alterar | Modo::Excluir => linhas.push(format!(
            "Pedido: *{}* | Cliente: *{}*",
            despacho.pedido, despacho.cliente
        )),
    }

    if despacho.modo.tem_itens() {
        linhas.push("Produtos:".to_string());
        for item in &despacho.itens {
            let mut linha = format!(
                "* *{}* - {} PC - {}",
                item.codigo, item.pacotes, item.descricao
            );
            if let Some(valor) = &item.valor {
                linha.push_str(&format!(" - *_R${}_*", valor));
            }
            linhas.push(linha);
        }
    }

    if let Some(obs) = &despacho.observacao {
        linhas.push(format!("Obs: {}", obs));
    }

    linhas.join("\n")
}

/// Deep link that opens a chat with the supervisor, message pre-filled.
pub fn link_whatsapp(telefone: &str, mensagem: &str) -> String {
    format!("https://wa.me/{}?text={}", telefone, urlencoding::encode(mensagem))
}
