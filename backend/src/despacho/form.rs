//! Form session state and its transition rules.
//!
//! The whole form is a single value mutated only through [`FormState::aplicar`],
//! so every field write goes through the formatters and every mode switch goes
//! through the same reset path.

use serde::{Deserialize, Serialize};

use super::compose::gerar_token;
use super::format::{
    digitos_max, formatar_pdv, formatar_valor, texto_max, MAX_OBSERVACAO, MAX_TEXTO,
};
use super::{Despacho, Item, Modo};

/// Live state of one form session.
#[derive(Debug, Clone, Serialize)]
pub struct FormState {
    pub modo: Modo,
    pub pedido: String,
    pub cliente: String,
    pub pdv: String,
    pub observacao: String,
    pub itens: Vec<Item>,
    /// Short identifier shown in the composed message. Regenerated on every
    /// mode switch, so it is not stable across edits.
    pub token: String,
    /// Set on the first submit attempt and kept until the next mode switch;
    /// the client uses it to decide whether to render validation errors.
    pub enviado: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::com_modo(Modo::Adicionar)
    }

    /// Blank defaults for a mode: empty order/client fields, one blank item
    /// for item-bearing modes, none for `excluir`.
    fn com_modo(modo: Modo) -> Self {
        let itens = if modo.tem_itens() {
            vec![Item::default()]
        } else {
            Vec::new()
        };
        FormState {
            modo,
            pedido: String::new(),
            cliente: String::new(),
            pdv: String::new(),
            observacao: String::new(),
            itens,
            token: gerar_token(),
            enviado: false,
        }
    }

    pub fn aplicar(&mut self, evento: FormEvent) -> Result<(), FormError> {
        match evento {
            FormEvent::SetModo { modo } => {
                *self = Self::com_modo(modo);
            }
            FormEvent::SetPedido { valor } => {
                self.pedido = digitos_max(&valor, self.modo.pedido_digitos());
            }
            FormEvent::SetCliente { valor } => {
                self.cliente = texto_max(&valor, MAX_TEXTO);
            }
            FormEvent::SetPdv { valor } => {
                self.pdv = formatar_pdv(&valor);
            }
            FormEvent::SetObservacao { valor } => {
                self.observacao = texto_max(&valor, MAX_OBSERVACAO);
            }
            FormEvent::ItemSet {
                indice,
                campo,
                valor,
            } => {
                if !self.modo.tem_itens() {
                    return Err(FormError::SemItens);
                }
                let item = self
                    .itens
                    .get_mut(indice)
                    .ok_or(FormError::ItemInexistente(indice))?;
                match campo {
                    CampoItem::Codigo => item.codigo = digitos_max(&valor, 6),
                    CampoItem::Pacotes => item.pacotes = digitos_max(&valor, 5),
                    CampoItem::Descricao => {
                        item.descricao = texto_max(&valor, MAX_TEXTO).to_uppercase()
                    }
                    CampoItem::Valor => {
                        let v = formatar_valor(&valor);
                        item.valor = (!v.is_empty()).then_some(v);
                    }
                }
            }
            FormEvent::ItemAdd => {
                if !self.modo.tem_itens() {
                    return Err(FormError::SemItens);
                }
                self.itens.push(Item::default());
            }
            FormEvent::ItemRemove { indice } => {
                if !self.modo.tem_itens() {
                    return Err(FormError::SemItens);
                }
                if self.itens.len() <= 1 {
                    return Err(FormError::UltimoItem);
                }
                if indice >= self.itens.len() {
                    return Err(FormError::ItemInexistente(indice));
                }
                self.itens.remove(indice);
            }
        }
        Ok(())
    }

    /// Snapshot for submission: blank items dropped, note emptied to `None`.
    pub fn finalizar(&self) -> Despacho {
        let observacao = self.observacao.trim();
        Despacho {
            modo: self.modo,
            pedido: self.pedido.clone(),
            cliente: self.cliente.clone(),
            pdv: self.pdv.clone(),
            observacao: (!observacao.is_empty()).then(|| observacao.to_string()),
            itens: self
                .itens
                .iter()
                .filter(|i| !i.em_branco())
                .cloned()
                .collect(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// One discrete form mutation, as posted by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum FormEvent {
    SetModo { modo: Modo },
    SetPedido { valor: String },
    SetCliente { valor: String },
    SetPdv { valor: String },
    SetObservacao { valor: String },
    ItemSet { indice: usize, campo: CampoItem, valor: String },
    ItemAdd,
    ItemRemove { indice: usize },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampoItem {
    Codigo,
    Pacotes,
    Descricao,
    Valor,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FormError {
    #[error("item {0} does not exist")]
    ItemInexistente(usize),

    #[error("the last item cannot be removed")]
    UltimoItem,

    #[error("this mode has no item list")]
    SemItens,
}
